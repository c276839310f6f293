mod config;
mod error;
mod flash;
mod forms;
mod guard;
mod handlers;
mod models;
mod services;
mod session;
mod state;
mod validation;
mod views;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use services::HttpMarketplace;
use session::SessionCodec;
use state::{AppState, FlowStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let api = HttpMarketplace::new(&config.backend_url).map_err(std::io::Error::other)?;
    let sessions = SessionCodec::new(
        config.session_secret.as_bytes(),
        config.session_ttl,
        config.cookie_secure,
    );
    let app_state = web::Data::new(AppState::new(
        Arc::new(api),
        sessions,
        FlowStore::new(config.flow_idle),
    ));

    info!(port = config.port, backend = %config.backend_url, "starting journeycraft web");

    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(handlers::configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
