//! Immutable service configuration, captured once at startup.

use crate::cli::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration shared by the editor handlers and the upstream client.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    /// Upstream render endpoint. Also the audience of identity tokens.
    pub upstream_url: String,
    /// Attach an identity token to every upstream call.
    pub authenticated: bool,
    pub metadata_host: String,
    pub upstream_timeout: Duration,
    pub templates_dir: PathBuf,
    pub max_body_bytes: usize,
}

impl ServiceConfig {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let unauthenticated = args.unauthenticated();
        let upstream_url = args
            .upstream_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingUpstreamUrl)?;

        if args.upstream_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "EDITOR_UPSTREAM_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            port: args.port,
            upstream_url,
            authenticated: !unauthenticated,
            metadata_host: args.metadata_host,
            upstream_timeout: Duration::from_secs(args.upstream_timeout_secs),
            templates_dir: args.templates_dir,
            max_body_bytes: args.max_body_bytes,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no configuration for upstream render service: add EDITOR_UPSTREAM_RENDER_URL environment variable")]
    MissingUpstreamUrl,

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}
