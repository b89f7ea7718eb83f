mod app_state;
mod assets;
mod cli;
mod config;
mod editor;
mod identity;
mod render;
mod utils;

use actix_web::{middleware::Logger, web, App, HttpServer};
use app_state::AppState;
use assets::{AssetError, Assets};
use clap::Parser;
use cli::Args;
use config::{ConfigError, ServiceConfig};
use render::UpstreamRenderer;
use std::sync::Arc;
use utils::{new_request_client, tls_config};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("loading editor assets: {0}")]
    Assets(#[from] AssetError),

    #[error("building TLS configuration: {0}")]
    Tls(#[from] rustls::Error),

    #[error("serving: {0}")]
    Io(#[from] std::io::Error),
}

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    env_logger::init();
    let config = Arc::new(ServiceConfig::from_args(Args::parse())?);
    if !config.authenticated {
        log::info!("editor: starting in unauthenticated upstream mode");
    }

    // Failures here stop startup before any request is served.
    let assets = Arc::new(Assets::load(&config.templates_dir).await?);
    let tls_client_config = Arc::new(tls_config()?);

    log::info!("Listening on {}, rendering via {}", config.bind_addr(), config.upstream_url);

    HttpServer::new({
        let config = config.clone();
        move || {
            let client = new_request_client(tls_client_config.clone());
            let renderer = UpstreamRenderer::new(client, &config);
            let state = AppState::new(assets.clone(), Box::new(renderer), config.max_body_bytes);

            App::new()
                .wrap(Logger::default())
                .app_data(web::Data::new(state))
                .configure(editor::routes)
        }
    })
    .bind(config.bind_addr())?
    .run()
    .await?;
    Ok(())
}
