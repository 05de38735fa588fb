//! Model handlers

use axum::{extract::State, Json};
use claimguard_core::logic::artifact::ArtifactSummary;
use claimguard_core::{EngineStatus, ScoringMethod};

use crate::models::ModelPerformance;
use crate::{AppResult, AppState};

/// Performance rows returned by `GET /api/model/performance`
const PERFORMANCE_HISTORY: i64 = 20;

/// Record metrics of every artifact the engine trained since the last call
pub async fn record_trained(state: &AppState) {
    for artifact in state.engine.take_trained() {
        match ModelPerformance::record(
            &state.pool,
            ScoringMethod::GradientBoosting.model_name(),
            &artifact.id,
            &artifact.metrics,
        )
        .await
        {
            Ok(Some(row)) => {
                tracing::info!(artifact_id = %artifact.id, accuracy = row.accuracy, "Recorded training metrics")
            }
            Ok(None) => tracing::debug!(artifact_id = %artifact.id, "Training metrics already recorded"),
            Err(e) => tracing::warn!(artifact_id = %artifact.id, "Failed to record training metrics: {}", e),
        }
    }
}

/// Engine state, artifact summary and counters
pub async fn status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.engine.status())
}

/// Train a fresh artifact from the canonical dataset and swap it in
pub async fn retrain(State(state): State<AppState>) -> AppResult<Json<ArtifactSummary>> {
    let engine = state.engine.clone();

    tracing::info!("Manual retrain requested");
    let result = tokio::task::spawn_blocking(move || engine.retrain()).await?;
    record_trained(&state).await;
    let artifact = result?;

    Ok(Json(artifact.summary()))
}

/// Recent training runs
pub async fn performance(State(state): State<AppState>) -> AppResult<Json<Vec<ModelPerformance>>> {
    let rows = ModelPerformance::recent(&state.pool, PERFORMANCE_HISTORY).await?;
    Ok(Json(rows))
}
