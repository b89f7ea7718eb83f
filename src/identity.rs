//! Identity tokens from the platform metadata server.

use actix_web::http::StatusCode;
use awc::error::{PayloadError, SendRequestError};
use awc::Client;
use std::time::Duration;

const METADATA_TIMEOUT: Duration = Duration::from_secs(5);
const IDENTITY_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/identity";

/// Fetches a short-lived identity token whose audience is `audience`.
pub async fn fetch_identity_token(
    client: &Client,
    metadata_host: &str,
    audience: &str,
) -> Result<String, IdentityError> {
    let url = format!("http://{}{}", metadata_host, IDENTITY_PATH);
    let request = client
        .get(&url)
        .insert_header(("Metadata-Flavor", "Google"))
        .query(&[("audience", audience)])
        .map_err(|e| IdentityError::Query(e.to_string()))?
        .timeout(METADATA_TIMEOUT);

    log::debug!("Requesting identity token from {}", url);

    let mut response = request.send().await.map_err(IdentityError::Request)?;
    if response.status() != StatusCode::OK {
        return Err(IdentityError::Status(response.status()));
    }

    let body = response.body().await.map_err(IdentityError::Body)?;
    let token = std::str::from_utf8(&body)
        .map(str::trim)
        .map_err(|_| IdentityError::InvalidToken)?;
    if token.is_empty() {
        return Err(IdentityError::InvalidToken);
    }
    Ok(token.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("metadata server unreachable: {0}")]
    Request(SendRequestError),

    #[error("metadata server responded {0}")]
    Status(StatusCode),

    #[error("reading metadata response: {0}")]
    Body(PayloadError),

    #[error("metadata server returned an empty or non UTF-8 token")]
    InvalidToken,

    #[error("encoding audience: {0}")]
    Query(String),
}
