//! Reports handlers

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Row};

use crate::models::ClaimWithPrediction;
use crate::{AppError, AppResult, AppState};

/// Rough loss avoided per detected fraud case
const ESTIMATED_LOSS_PER_FRAUD_CASE: i64 = 30_000;

const EXPORT_FILENAME: &str = "fraud_detection_report.csv";

#[derive(Debug, FromRow)]
struct MonthRow {
    month: DateTime<Utc>,
    total_claims: i64,
    fraud_detected: i64,
    avg_probability: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MonthlyTrend {
    pub month: String,
    pub detected: i64,
    /// Mean fraud probability (%) of scored claims; null when none were scored
    pub accuracy: Option<f64>,
    pub total_claims: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct RegionalAnalysis {
    pub region: String,
    pub cases: i64,
    pub fraud_cases: i64,
    pub accuracy: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_claims_processed: i64,
    pub fraud_cases_detected: i64,
    pub average_accuracy: Option<f64>,
    pub potential_fraud_saved: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "csv" => Some(ExportFormat::Csv),
            "excel" => Some(ExportFormat::Excel),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }
}

/// Claims and fraud detections per month, last six months
pub async fn monthly_trends(State(state): State<AppState>) -> AppResult<Json<Vec<MonthlyTrend>>> {
    let rows = sqlx::query_as::<_, MonthRow>(
        r#"
        SELECT
            DATE_TRUNC('month', ic.created_at) AS month,
            COUNT(*) AS total_claims,
            COUNT(fp.id) FILTER (WHERE fp.fraud_prediction) AS fraud_detected,
            ROUND((AVG(fp.fraud_probability) * 100)::NUMERIC, 1)::FLOAT8 AS avg_probability
        FROM insurance_claims ic
        LEFT JOIN fraud_predictions fp ON ic.claim_id = fp.claim_id
        WHERE ic.created_at >= NOW() - INTERVAL '6 months'
        GROUP BY DATE_TRUNC('month', ic.created_at)
        ORDER BY month DESC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let trends = rows
        .into_iter()
        .map(|row| MonthlyTrend {
            month: row.month.format("%b").to_string(),
            detected: row.fraud_detected,
            accuracy: row.avg_probability,
            total_claims: row.total_claims,
        })
        .collect();

    Ok(Json(trends))
}

/// Claims and fraud detections per region
pub async fn regional_analysis(State(state): State<AppState>) -> AppResult<Json<Vec<RegionalAnalysis>>> {
    let rows = sqlx::query_as::<_, RegionalAnalysis>(
        r#"
        SELECT
            ic.region,
            COUNT(*) AS cases,
            COUNT(fp.id) FILTER (WHERE fp.fraud_prediction) AS fraud_cases,
            ROUND((AVG(fp.fraud_probability) * 100)::NUMERIC, 1)::FLOAT8 AS accuracy
        FROM insurance_claims ic
        LEFT JOIN fraud_predictions fp ON ic.claim_id = fp.claim_id
        GROUP BY ic.region
        ORDER BY cases DESC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

/// Report headline figures
pub async fn summary_stats(State(state): State<AppState>) -> AppResult<Json<SummaryStats>> {
    let row = sqlx::query(
        r#"
        SELECT
            (SELECT COUNT(*) FROM insurance_claims) AS total_claims,
            COUNT(*) FILTER (WHERE fraud_prediction) AS fraud_cases,
            ROUND((AVG(fraud_probability) * 100)::NUMERIC, 1)::FLOAT8 AS accuracy
        FROM fraud_predictions
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    let fraud_cases: i64 = row.get("fraud_cases");

    Ok(Json(SummaryStats {
        total_claims_processed: row.get("total_claims"),
        fraud_cases_detected: fraud_cases,
        average_accuracy: row.get("accuracy"),
        potential_fraud_saved: fraud_cases * ESTIMATED_LOSS_PER_FRAUD_CASE,
    }))
}

/// Export every claim with its prediction
pub async fn export(
    State(state): State<AppState>,
    Path(format): Path<String>,
) -> AppResult<Response> {
    let format = ExportFormat::parse(&format)
        .ok_or_else(|| AppError::ValidationError("Invalid format. Use csv, excel, or pdf".to_string()))?;

    let rows = ClaimWithPrediction::all(&state.pool).await?;
    tracing::info!(rows = rows.len(), ?format, "Exporting claims report");

    match format {
        ExportFormat::Csv => {
            let body = claims_csv(&rows)?;
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::CONTENT_DISPOSITION, format!("attachment; filename={}", EXPORT_FILENAME)),
                ],
                body,
            )
                .into_response())
        }
        ExportFormat::Excel => Ok(Json(serde_json::json!({
            "message": "Excel export not fully implemented yet. Use CSV export.",
            "data": rows,
        }))
        .into_response()),
        ExportFormat::Pdf => Ok(Json(serde_json::json!({
            "message": "PDF export not fully implemented yet. Use CSV export.",
            "data": rows,
        }))
        .into_response()),
    }
}

// ============================================================================
// CSV
// ============================================================================

const EXPORT_COLUMNS: [&str; 38] = [
    "id",
    "claim_id",
    "age_group",
    "gender",
    "marital_status",
    "income_band",
    "employment_status",
    "address_change_last_6_months",
    "deductible_level",
    "days_policy_accident",
    "days_policy_claim",
    "past_number_of_claims",
    "vehicle_category",
    "vehicle_price_range",
    "vehicle_age_years",
    "accident_area",
    "police_report_filed",
    "witness_present",
    "weather_condition",
    "accident_time",
    "agent_type",
    "claim_amendments",
    "address_change_linked_to_claim",
    "claim_amount_range",
    "payout_to_claim_ratio",
    "claim_channel",
    "repair_shop_pattern",
    "fraud_percentage_estimate",
    "fraud_type",
    "high_risk_combination",
    "region",
    "created_at",
    "updated_at",
    "fraud_prediction",
    "fraud_probability",
    "risk_level",
    "model_used",
    "prediction_date",
];

fn export_record(row: &ClaimWithPrediction) -> Vec<String> {
    let c = &row.claim;
    let opt = |v: Option<String>| v.unwrap_or_default();
    vec![
        c.id.to_string(),
        c.claim_id.clone(),
        c.age_group.clone(),
        c.gender.clone(),
        c.marital_status.clone(),
        c.income_band.clone(),
        c.employment_status.clone(),
        c.address_change_last_6_months.to_string(),
        c.deductible_level.clone(),
        c.days_policy_accident.to_string(),
        c.days_policy_claim.to_string(),
        c.past_number_of_claims.to_string(),
        c.vehicle_category.clone(),
        c.vehicle_price_range.clone(),
        c.vehicle_age_years.to_string(),
        c.accident_area.clone(),
        c.police_report_filed.to_string(),
        c.witness_present.to_string(),
        c.weather_condition.clone(),
        c.accident_time.clone(),
        c.agent_type.clone(),
        c.claim_amendments.to_string(),
        c.address_change_linked_to_claim.to_string(),
        c.claim_amount_range.clone(),
        c.payout_to_claim_ratio.to_string(),
        c.claim_channel.clone(),
        c.repair_shop_pattern.clone(),
        c.fraud_percentage_estimate.to_string(),
        c.fraud_type.clone(),
        c.high_risk_combination.to_string(),
        c.region.clone(),
        c.created_at.to_rfc3339(),
        c.updated_at.to_rfc3339(),
        opt(row.fraud_prediction.map(|v| v.to_string())),
        opt(row.fraud_probability.map(|v| v.to_string())),
        opt(row.risk_level.clone()),
        opt(row.model_used.clone()),
        opt(row.prediction_date.map(|d| d.to_rfc3339())),
    ]
}

/// CSV bytes with a header row; an empty export is header-only
pub fn claims_csv(rows: &[ClaimWithPrediction]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let internal = |e: csv::Error| AppError::InternalError(format!("CSV export failed: {}", e));

    writer.write_record(EXPORT_COLUMNS).map_err(internal)?;
    for row in rows {
        writer.write_record(export_record(row)).map_err(internal)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::InternalError(format!("CSV export failed: {}", e)))
}
