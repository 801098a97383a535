//! Service entry point: resolves configuration, picks a store, and serves
//! the REST API.

use std::sync::Arc;

use anyhow::Context;
use api_rest::{app, AppState};
use medrec_core::repositories::{MemoryStore, PgStore};
use medrec_core::AppConfig;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let state = match config.database_url() {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .context("failed to connect to Postgres")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("failed to run migrations")?;
            tracing::info!("connected to Postgres");
            AppState::from_store(Arc::new(PgStore::new(pool)), config.profile())
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store");
            AppState::from_store(Arc::new(MemoryStore::new()), config.profile())
        }
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    tracing::info!(addr = %config.bind_addr(), profile = ?config.profile(), "listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
