//! Claims handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use claimguard_core::logic::model::RiskLevel;
use serde::Serialize;
use validator::Validate;

use crate::models::{Claim, ClaimFilter, ClaimList, ClaimWithPrediction, CreateClaim, CreateClaimResponse, Pagination};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub claim: ClaimWithPrediction,
}

/// Create a new insurance claim
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateClaim>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreateClaimResponse>)> {
    let Json(data) = payload?;
    data.validate()?;

    let claim = Claim::create(&state.pool, &data).await?;
    tracing::info!(claim_id = %claim.claim_id, region = %claim.region, "Claim created");

    Ok((
        StatusCode::CREATED,
        Json(CreateClaimResponse {
            message: "Claim created successfully",
            claim_id: claim.claim_id,
            database_id: claim.id,
        }),
    ))
}

/// List claims with their predictions, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ClaimFilter>,
) -> AppResult<Json<ClaimList>> {
    let risk_level = filter
        .risk_level
        .as_deref()
        .map(|raw| {
            RiskLevel::parse(raw)
                .map(|level| level.label())
                .ok_or_else(|| AppError::ValidationError(format!("Unknown risk level: {}", raw)))
        })
        .transpose()?;
    let region = filter.region.as_deref();

    let (page, limit) = (filter.page(), filter.limit());
    let claims = ClaimWithPrediction::list(&state.pool, risk_level, region, limit, filter.offset()).await?;
    let total = ClaimWithPrediction::count(&state.pool, risk_level, region).await?;

    Ok(Json(ClaimList {
        claims,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// Get a single claim
pub async fn get(
    State(state): State<AppState>,
    Path(claim_id): Path<String>,
) -> AppResult<Json<ClaimResponse>> {
    let claim = ClaimWithPrediction::find(&state.pool, &claim_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Claim not found".to_string()))?;

    Ok(Json(ClaimResponse { claim }))
}
