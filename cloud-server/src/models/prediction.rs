//! Fraud prediction model

use chrono::{DateTime, Utc};
use claimguard_core::PredictionResult;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FraudPrediction {
    pub id: i32,
    pub claim_id: String,
    pub fraud_prediction: bool,
    pub fraud_probability: f64,
    pub risk_level: String,
    pub model_used: String,
    pub prediction_confidence: Option<f64>,
    pub risk_factors: Option<serde_json::Value>,
    pub raw_score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Response for a single-claim prediction
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub claim_id: String,
    pub prediction: PredictionResult,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, serde::Deserialize)]
pub struct BatchPredictRequest {
    #[serde(default)]
    pub claim_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchPredictItem {
    pub claim_id: String,
    pub prediction: PredictionResult,
}

#[derive(Debug, Serialize)]
pub struct BatchPredictResponse {
    pub results: Vec<BatchPredictItem>,
    pub total_processed: usize,
    pub timestamp: DateTime<Utc>,
}

impl FraudPrediction {
    /// Store the latest result for a claim, replacing any earlier one
    pub async fn upsert(pool: &PgPool, claim_id: &str, result: &PredictionResult) -> Result<Self, sqlx::Error> {
        let risk_factors = result
            .risk_factors
            .as_ref()
            .map(|factors| serde_json::Value::from(factors.clone()));

        sqlx::query_as::<_, FraudPrediction>(
            r#"
            INSERT INTO fraud_predictions (
                claim_id, fraud_prediction, fraud_probability, risk_level,
                model_used, prediction_confidence, risk_factors, raw_score
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (claim_id) DO UPDATE SET
                fraud_prediction = EXCLUDED.fraud_prediction,
                fraud_probability = EXCLUDED.fraud_probability,
                risk_level = EXCLUDED.risk_level,
                model_used = EXCLUDED.model_used,
                prediction_confidence = EXCLUDED.prediction_confidence,
                risk_factors = EXCLUDED.risk_factors,
                raw_score = EXCLUDED.raw_score,
                created_at = NOW()
            RETURNING *
            "#,
        )
        .bind(claim_id)
        .bind(result.prediction)
        .bind(result.probability)
        .bind(result.risk_level.label())
        .bind(result.model_name())
        .bind(result.probability)
        .bind(risk_factors)
        .bind(result.raw_score.map(|s| s as i32))
        .fetch_one(pool)
        .await
    }
}
