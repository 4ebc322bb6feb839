//! Steward API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use steward_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, StoreBackend};
use crate::api_services::{
    build_app_state, build_identity_backends, build_memory_session_layer,
    build_postgres_session_layer, connect_and_migrate, seed_bootstrap_admin,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;

    let pool = match &config.store_backend {
        StoreBackend::Memory => None,
        StoreBackend::Postgres { database_url } => Some(connect_and_migrate(database_url).await?),
    };

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let backends = build_identity_backends(pool.clone()).await?;
    seed_bootstrap_admin(&backends, &config).await?;

    let app_state = build_app_state(backends, &config)?;
    let router = api_router::build_router(app_state, &config.frontend_url)?;
    let app = match pool {
        Some(pool) => router.layer(build_postgres_session_layer(pool, config.cookie_secure).await?),
        None => router.layer(build_memory_session_layer(config.cookie_secure)),
    };

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "steward-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
