//! Dashboard handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use claimguard_core::logic::model::RiskLevel;
use serde::Serialize;
use sqlx::FromRow;

use crate::{AppResult, AppState};

const RECENT_PREDICTIONS: i64 = 10;

#[derive(Debug, Serialize, FromRow)]
pub struct PredictionCounts {
    pub total_predictions: i64,
    pub fraud_cases: i64,
    pub high_risk: i64,
    pub medium_risk: i64,
    pub low_risk: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct RegionCount {
    pub region: String,
    pub count: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct RecentPrediction {
    pub claim_id: String,
    pub region: String,
    pub risk_level: String,
    pub fraud_probability: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_claims: i64,
    pub fraud_predictions: PredictionCounts,
    pub region_stats: Vec<RegionCount>,
    pub recent_predictions: Vec<RecentPrediction>,
}

/// Headline counts for the dashboard
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let total_claims: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM insurance_claims")
        .fetch_one(&state.pool)
        .await?;

    let fraud_predictions = sqlx::query_as::<_, PredictionCounts>(
        r#"
        SELECT
            COUNT(*) AS total_predictions,
            COUNT(*) FILTER (WHERE fraud_prediction) AS fraud_cases,
            COUNT(*) FILTER (WHERE risk_level = $1) AS high_risk,
            COUNT(*) FILTER (WHERE risk_level = $2) AS medium_risk,
            COUNT(*) FILTER (WHERE risk_level = $3) AS low_risk
        FROM fraud_predictions
        "#,
    )
    .bind(RiskLevel::High.label())
    .bind(RiskLevel::Medium.label())
    .bind(RiskLevel::Low.label())
    .fetch_one(&state.pool)
    .await?;

    let region_stats = sqlx::query_as::<_, RegionCount>(
        "SELECT region, COUNT(*) AS count FROM insurance_claims GROUP BY region ORDER BY count DESC",
    )
    .fetch_all(&state.pool)
    .await?;

    let recent_predictions = sqlx::query_as::<_, RecentPrediction>(
        r#"
        SELECT ic.claim_id, ic.region, fp.risk_level, fp.fraud_probability, fp.created_at
        FROM insurance_claims ic
        JOIN fraud_predictions fp ON ic.claim_id = fp.claim_id
        ORDER BY fp.created_at DESC
        LIMIT $1
        "#,
    )
    .bind(RECENT_PREDICTIONS)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(DashboardStats {
        total_claims,
        fraud_predictions,
        region_stats,
        recent_predictions,
    }))
}
