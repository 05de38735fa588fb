//! Model performance history

use chrono::{DateTime, Utc};
use claimguard_core::logic::model::TrainingMetrics;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ModelPerformance {
    pub id: i32,
    pub model_name: String,
    pub artifact_id: Option<String>,
    pub accuracy: f64,
    pub precision_score: f64,
    pub recall_score: f64,
    pub f1_score: f64,
    pub roc_auc: Option<f64>,
    pub training_date: DateTime<Utc>,
    pub dataset_size: i32,
    pub fraud_cases: i32,
    pub non_fraud_cases: i32,
}

impl ModelPerformance {
    /// Record the metrics of one training run; `None` if the artifact already has a row
    pub async fn record(
        pool: &PgPool,
        model_name: &str,
        artifact_id: &str,
        metrics: &TrainingMetrics,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ModelPerformance>(
            r#"
            INSERT INTO model_performance (
                model_name, artifact_id, accuracy, precision_score, recall_score,
                f1_score, roc_auc, dataset_size, fraud_cases, non_fraud_cases
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (artifact_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(model_name)
        .bind(artifact_id)
        .bind(metrics.accuracy)
        .bind(metrics.precision)
        .bind(metrics.recall)
        .bind(metrics.f1_score)
        .bind(metrics.roc_auc)
        .bind(metrics.dataset_size as i32)
        .bind(metrics.fraud_cases as i32)
        .bind(metrics.non_fraud_cases as i32)
        .fetch_optional(pool)
        .await
    }

    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ModelPerformance>(
            "SELECT * FROM model_performance ORDER BY training_date DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
