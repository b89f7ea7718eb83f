//! Markdown rendering, delegated to the upstream render service.

use crate::config::ServiceConfig;
use crate::identity::{fetch_identity_token, IdentityError};
use actix_web::http::StatusCode;
use actix_web::web::Bytes;
use async_trait::async_trait;
use awc::error::{PayloadError, SendRequestError};
use awc::Client;
use std::time::Duration;

const UPSTREAM_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Renders markdown bytes to HTML bytes.
#[async_trait(?Send)]
pub trait MarkdownRenderer {
    async fn render(&self, markdown: Bytes) -> Result<Bytes, RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("acquiring identity token: {0}")]
    Credential(#[from] IdentityError),

    #[error("calling upstream render service: {0}")]
    Transport(SendRequestError),

    #[error("reading upstream response: {0}")]
    Body(PayloadError),

    /// The upstream answered, but not with 200 OK.
    #[error("upstream render service responded {status}")]
    NotOk { status: StatusCode, body: Bytes },
}

impl RenderError {
    /// Failures of the credential subsystem rather than of the upstream itself.
    pub fn is_credential(&self) -> bool {
        matches!(self, RenderError::Credential(_))
    }
}

/// HTTP client for the upstream render service.
pub struct UpstreamRenderer {
    client: Client,
    url: String,
    authenticated: bool,
    metadata_host: String,
    timeout: Duration,
}

impl UpstreamRenderer {
    pub fn new(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            url: config.upstream_url.clone(),
            authenticated: config.authenticated,
            metadata_host: config.metadata_host.clone(),
            timeout: config.upstream_timeout,
        }
    }
}

#[async_trait(?Send)]
impl MarkdownRenderer for UpstreamRenderer {
    async fn render(&self, markdown: Bytes) -> Result<Bytes, RenderError> {
        let mut request = self
            .client
            .post(&self.url)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .timeout(self.timeout);

        if self.authenticated {
            let token = fetch_identity_token(&self.client, &self.metadata_host, &self.url).await?;
            request = request.insert_header(("Authorization", format!("Bearer {}", token)));
        }

        log::debug!("Forwarding {} bytes of markdown to: {}", markdown.len(), self.url);

        let mut response = request
            .send_body(markdown)
            .await
            .map_err(RenderError::Transport)?;
        let status = response.status();
        let body = response
            .body()
            .limit(UPSTREAM_BODY_LIMIT)
            .await
            .map_err(RenderError::Body)?;

        if status != StatusCode::OK {
            return Err(RenderError::NotOk { status, body });
        }
        Ok(body)
    }
}
