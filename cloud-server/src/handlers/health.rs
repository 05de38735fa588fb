//! Health check handler

use axum::{extract::State, Json};
use claimguard_core::{ArtifactState, ScoringMode};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: &'static str,
    version: &'static str,
    environment: String,
    model_state: ArtifactState,
    scoring_mode: ScoringMode,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Fraud Detection API is running",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        model_state: state.engine.state(),
        scoring_mode: state.engine.config().mode,
        timestamp: chrono::Utc::now().timestamp(),
    })
}
