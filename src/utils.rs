use actix_web::http::StatusCode;
use awc::{Client, Connector};
use rustls::ClientConfig;
use rustls_platform_verifier::BuilderVerifierExt;
use std::sync::Arc;

pub fn tls_config() -> Result<ClientConfig, rustls::Error> {
    let arc_crypto_provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let mut cc = ClientConfig::builder_with_provider(arc_crypto_provider)
        .with_safe_default_protocol_versions()?
        .with_platform_verifier()?
        .with_no_client_auth();
    cc.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];
    log::debug!("TLS configuration created");
    Ok(cc)
}

pub fn new_request_client(connector_default_config: Arc<ClientConfig>) -> Client {
    let connector = Connector::new()
        .rustls_0_23(connector_default_config)
        .max_http_version(awc::http::Version::HTTP_2);

    let request_client = Client::builder()
        .connector(connector)
        .max_http_version(awc::http::Version::HTTP_2)
        // Per-request timeouts are set by the callers.
        .disable_timeout()
        .finish();
    log::debug!("Request client created");
    request_client
}

/// Canonical reason phrase for a status, e.g. "Service Unavailable".
pub fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}

/// HTML-escapes `&<>"'`, leaving everything else (including `/`) as is.
pub fn escape_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
