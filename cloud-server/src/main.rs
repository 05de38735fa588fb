//! ClaimGuard Server
//!
//! Claims management API with fraud scoring.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CLAIMGUARD SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────┐  ┌─────────────────┐  │
//! │  │  API      │  │  FraudEngine     │  │  Reports /      │  │
//! │  │  (Axum)   │──│  (blocking pool) │  │  Dashboard      │  │
//! │  └─────┬─────┘  └──────────────────┘  └────────┬────────┘  │
//! │        └──────────────────┬────────────────────┘           │
//! │                           ▼                                 │
//! │                    ┌─────────────┐                          │
//! │                    │ PostgreSQL  │                          │
//! │                    └─────────────┘                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod error;
mod handlers;
mod models;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use claimguard_core::FraudEngine;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

const DEFAULT_LOG_FILTER: &str = "claimguard_server=debug,claimguard_core=info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging; `init` also routes the core's `log` records here
    let production = config.is_production();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(production.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!production).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("ClaimGuard Server starting ({})...", config.environment);
    tracing::info!("Database: {}", config.database_url.split('@').last().unwrap_or("***"));

    // Initialize database pool
    let pool = db::create_pool(&config.database_url)
        .await
        .context("Failed to create database pool")?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    // Build application state
    let state = AppState {
        pool,
        engine: Arc::new(FraudEngine::from_config(config.engine.clone())),
        config: config.clone(),
    };

    initialize_engine(&state).await;

    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub engine: Arc<FraudEngine>,
    pub config: config::Config,
}

/// Load or train the artifact; the rule path keeps working if this fails
async fn initialize_engine(state: &AppState) {
    let engine = state.engine.clone();
    tracing::info!(mode = %engine.config().mode, "Initializing fraud engine...");

    match tokio::task::spawn_blocking(move || engine.initialize()).await {
        Ok(Ok(artifact)) => {
            tracing::info!(artifact_id = %artifact.id, trees = artifact.classifier.n_trees(), "Fraud engine ready");
        }
        Ok(Err(e)) => tracing::warn!("Fraud model unavailable, heuristic scoring only: {}", e),
        Err(e) => tracing::error!("Fraud engine initialization panicked: {}", e),
    }

    handlers::model::record_trained(state).await;
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health::check))

        // Claims
        .route("/api/claims", post(handlers::claims::create).get(handlers::claims::list))
        .route("/api/claims/:claim_id", get(handlers::claims::get))

        // Predictions
        .route("/api/claims/:claim_id/predict", post(handlers::predictions::predict))
        .route("/api/batch-predict", post(handlers::predictions::batch))

        // Dashboard & reports
        .route("/api/dashboard/stats", get(handlers::dashboard::stats))
        .route("/api/reports/monthly-trends", get(handlers::reports::monthly_trends))
        .route("/api/reports/regional-analysis", get(handlers::reports::regional_analysis))
        .route("/api/reports/summary-stats", get(handlers::reports::summary_stats))
        .route("/api/reports/export/:format", get(handlers::reports::export))

        // Model
        .route("/api/model/status", get(handlers::model::status))
        .route("/api/model/performance", get(handlers::model::performance))
        .route("/api/model/retrain", post(handlers::model::retrain))

        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
