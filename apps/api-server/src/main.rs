//! # Blog API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::middleware::NormalizePath;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use blog_infra::{BlogStore, StoreBackend};

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;

    telemetry::init_telemetry(&config.telemetry);

    tracing::info!(
        "Starting Blog API Server on {}:{}",
        config.host,
        config.port
    );

    if config.database.backend() == StoreBackend::Memory {
        tracing::warn!("Running with the in-memory store; posts are lost on exit.");
    }

    // A store that cannot be reached at startup is fatal.
    let store = BlogStore::connect(&config.database)
        .await
        .context("failed to connect to the blog store")?;
    let state = AppState::new(&store);

    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("Server stopped, closing blog store");
    store.close().await.context("failed to close the blog store")?;
    Ok(())
}
