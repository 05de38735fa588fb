//! Prediction handlers

use std::future::Future;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Utc;
use claimguard_core::logic::engine::BatchPrediction;
use claimguard_core::PredictionResult;

use super::model::record_trained;
use crate::models::{
    BatchPredictItem, BatchPredictRequest, BatchPredictResponse, Claim, FraudPrediction, PredictionResponse,
};
use crate::{AppError, AppResult, AppState};

/// Run the engine off the async runtime
async fn score(state: &AppState, claim: &Claim) -> AppResult<PredictionResult> {
    let engine = state.engine.clone();
    let record = claim.to_record();

    let result = tokio::task::spawn_blocking(move || engine.score(&record)).await?;
    record_trained(state).await;

    Ok(result?)
}

/// Predict fraud for a stored claim
pub async fn predict(
    State(state): State<AppState>,
    Path(claim_id): Path<String>,
) -> AppResult<Json<PredictionResponse>> {
    let claim = Claim::find_by_claim_id(&state.pool, &claim_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Claim not found".to_string()))?;

    let prediction = score(&state, &claim).await?;
    FraudPrediction::upsert(&state.pool, &claim.claim_id, &prediction).await?;

    tracing::info!(
        claim_id = %claim.claim_id,
        probability = prediction.probability,
        risk_level = %prediction.risk_level,
        "Claim scored"
    );

    Ok(Json(PredictionResponse {
        claim_id: claim.claim_id,
        prediction,
        timestamp: Utc::now(),
    }))
}

/// Predict fraud for several stored claims; unknown IDs are skipped
pub async fn batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchPredictRequest>, JsonRejection>,
) -> AppResult<Json<BatchPredictResponse>> {
    let Json(request) = payload?;
    if request.claim_ids.is_empty() {
        return Err(AppError::ValidationError("No claim IDs provided".to_string()));
    }

    let pool = state.pool.clone();
    let claims = find_claims(&request.claim_ids, |claim_id| {
        let pool = pool.clone();
        async move { Claim::find_by_claim_id(&pool, &claim_id).await }
    })
    .await?;

    let engine = state.engine.clone();
    let records: Vec<_> = claims.iter().map(Claim::to_record).collect();
    let outcomes = tokio::task::spawn_blocking(move || engine.predict_batch(&records)).await?;
    record_trained(&state).await;

    let results = scored_items(&claims, outcomes);
    for item in &results {
        FraudPrediction::upsert(&state.pool, &item.claim_id, &item.prediction).await?;
    }

    tracing::info!(requested = request.claim_ids.len(), processed = results.len(), "Batch prediction finished");

    Ok(Json(BatchPredictResponse {
        total_processed: results.len(),
        results,
        timestamp: Utc::now(),
    }))
}

/// Look up each requested claim in order; IDs with no stored claim are skipped
async fn find_claims<F, Fut>(claim_ids: &[String], mut lookup: F) -> AppResult<Vec<Claim>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Option<Claim>, sqlx::Error>>,
{
    let mut claims = Vec::with_capacity(claim_ids.len());
    for claim_id in claim_ids {
        match lookup(claim_id.clone()).await? {
            Some(claim) => claims.push(claim),
            None => tracing::debug!(claim_id = %claim_id, "Skipping unknown claim"),
        }
    }
    Ok(claims)
}

/// Pair batch outcomes with their claims; claims that failed to score are left out
fn scored_items(claims: &[Claim], outcomes: Vec<BatchPrediction>) -> Vec<BatchPredictItem> {
    outcomes
        .into_iter()
        .filter_map(|outcome| {
            let claim_id = claims.get(outcome.index)?.claim_id.clone();
            match outcome.result {
                Some(prediction) => Some(BatchPredictItem { claim_id, prediction }),
                None => {
                    tracing::warn!(claim_id = %claim_id, error = ?outcome.error, "Claim could not be scored");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use claimguard_core::logic::artifact::FileArtifactStore;
    use claimguard_core::logic::dataset::InMemoryDataset;
    use claimguard_core::{EngineConfig, FraudEngine, ScoringMode};

    use super::*;

    fn engine(mode: ScoringMode) -> FraudEngine {
        let path = std::env::temp_dir().join("claimguard-batch-test").join("model.json");
        let config = EngineConfig {
            artifact_path: path.clone(),
            dataset_path: path.with_extension("csv"),
            mode,
        };
        // never initialized: model mode has no artifact
        FraudEngine::new(config, Arc::new(InMemoryDataset::synthetic(50, 1)), Arc::new(FileArtifactStore::new(path)))
    }

    async fn stored(ids: &[&str], requested: &[&str]) -> Vec<Claim> {
        let store: HashMap<String, Claim> =
            ids.iter().map(|id| (id.to_string(), Claim::fixture(id))).collect();
        let requested: Vec<String> = requested.iter().map(|id| id.to_string()).collect();

        find_claims(&requested, |claim_id| {
            let found = store.get(&claim_id).cloned();
            async move { Ok(found) }
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_claims_are_skipped() {
        let claims = stored(&["CLM-A", "CLM-C"], &["CLM-A", "CLM-B", "CLM-C"]).await;
        let ids: Vec<_> = claims.iter().map(|c| c.claim_id.as_str()).collect();
        assert_eq!(ids, ["CLM-A", "CLM-C"]);

        let records: Vec<_> = claims.iter().map(Claim::to_record).collect();
        let items = scored_items(&claims, engine(ScoringMode::Heuristic).predict_batch(&records));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].claim_id, "CLM-A");
        assert_eq!(items[1].claim_id, "CLM-C");
    }

    #[tokio::test]
    async fn test_lookup_error_aborts_batch() {
        let requested = vec!["CLM-A".to_string()];
        let result = find_claims(&requested, |_| async { Err(sqlx::Error::PoolTimedOut) }).await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_unscored_claims_are_left_out() {
        let claims = stored(&["CLM-A", "CLM-B"], &["CLM-A", "CLM-B"]).await;
        let records: Vec<_> = claims.iter().map(Claim::to_record).collect();

        let mut outcomes = engine(ScoringMode::Heuristic).predict_batch(&records);
        let failed = engine(ScoringMode::Model).predict_batch(&records[1..]);
        outcomes[1] = BatchPrediction { index: 1, ..failed[0].clone() };

        let items = scored_items(&claims, outcomes);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].claim_id, "CLM-A");
    }
}
