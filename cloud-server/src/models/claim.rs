//! Claim model

use chrono::{DateTime, Utc};
use claimguard_core::logic::claim::ClaimRecord;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

/// The claim store only holds vehicle policies
pub const POLICY_TYPE: &str = "Vehicle";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Claim {
    pub id: i32,
    pub claim_id: String,
    pub age_group: String,
    pub gender: String,
    pub marital_status: String,
    pub income_band: String,
    pub employment_status: String,
    pub address_change_last_6_months: bool,
    pub deductible_level: String,
    pub days_policy_accident: i32,
    pub days_policy_claim: i32,
    pub past_number_of_claims: i32,
    pub vehicle_category: String,
    pub vehicle_price_range: String,
    pub vehicle_age_years: i32,
    pub accident_area: String,
    pub police_report_filed: bool,
    pub witness_present: bool,
    pub weather_condition: String,
    pub accident_time: String,
    pub agent_type: String,
    pub claim_amendments: i32,
    pub address_change_linked_to_claim: bool,
    pub claim_amount_range: String,
    pub payout_to_claim_ratio: f64,
    pub claim_channel: String,
    pub repair_shop_pattern: String,
    pub fraud_percentage_estimate: f64,
    pub fraud_type: String,
    pub high_risk_combination: bool,
    pub region: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Claim joined with its latest prediction, if any
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ClaimWithPrediction {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub claim: Claim,
    pub fraud_prediction: Option<bool>,
    pub fraud_probability: Option<f64>,
    pub risk_level: Option<String>,
    pub model_used: Option<String>,
    pub prediction_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClaim {
    #[validate(length(min = 1, max = 50))]
    pub claim_id: String,
    #[validate(length(min = 1, max = 20))]
    pub age_group: String,
    #[validate(length(min = 1, max = 10))]
    pub gender: String,
    #[validate(length(min = 1, max = 20))]
    pub marital_status: String,
    #[validate(length(min = 1, max = 20))]
    pub income_band: String,
    #[validate(length(min = 1, max = 20))]
    pub employment_status: String,
    pub address_change_last_6_months: bool,
    #[validate(length(min = 1, max = 10))]
    pub deductible_level: String,
    #[validate(range(min = 0))]
    pub days_policy_accident: i32,
    #[validate(range(min = 0))]
    pub days_policy_claim: i32,
    #[validate(range(min = 0))]
    pub past_number_of_claims: i32,
    #[validate(length(min = 1, max = 20))]
    pub vehicle_category: String,
    #[validate(length(min = 1, max = 20))]
    pub vehicle_price_range: String,
    #[validate(range(min = 0))]
    pub vehicle_age_years: i32,
    #[validate(length(min = 1, max = 20))]
    pub accident_area: String,
    pub police_report_filed: bool,
    pub witness_present: bool,
    #[validate(length(min = 1, max = 20))]
    pub weather_condition: String,
    #[validate(length(min = 1, max = 20))]
    pub accident_time: String,
    #[validate(length(min = 1, max = 20))]
    pub agent_type: String,
    #[validate(range(min = 0))]
    pub claim_amendments: i32,
    pub address_change_linked_to_claim: bool,
    #[validate(length(min = 1, max = 20))]
    pub claim_amount_range: String,
    #[validate(range(min = 0.0))]
    pub payout_to_claim_ratio: f64,
    #[validate(length(min = 1, max = 20))]
    pub claim_channel: String,
    #[validate(length(min = 1, max = 20))]
    pub repair_shop_pattern: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub fraud_percentage_estimate: f64,
    #[validate(length(min = 1, max = 30))]
    pub fraud_type: String,
    pub high_risk_combination: bool,
    #[validate(length(min = 1, max = 30))]
    pub region: String,
}

#[derive(Debug, Serialize)]
pub struct CreateClaimResponse {
    pub message: &'static str,
    pub claim_id: String,
    pub database_id: i32,
}

#[derive(Debug, Deserialize, Default)]
pub struct ClaimFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub risk_level: Option<String>,
    pub region: Option<String>,
}

impl ClaimFilter {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT)
    }

    /// Saturates instead of overflowing for absurd page numbers
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self { page, limit, total, pages: (total + limit - 1) / limit }
    }
}

#[derive(Debug, Serialize)]
pub struct ClaimList {
    pub claims: Vec<ClaimWithPrediction>,
    pub pagination: Pagination,
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

impl Claim {
    /// Flat record the scoring core consumes
    pub fn to_record(&self) -> ClaimRecord {
        ClaimRecord {
            age_group: self.age_group.clone(),
            gender: self.gender.clone(),
            marital_status: self.marital_status.clone(),
            income_band: self.income_band.clone(),
            address_change_last_6_months: yes_no(self.address_change_last_6_months),
            policy_type: POLICY_TYPE.to_string(),
            deductible_level: self.deductible_level.clone(),
            days_policy_accident: self.days_policy_accident as f64,
            days_policy_claim: self.days_policy_claim as f64,
            vehicle_category: self.vehicle_category.clone(),
            vehicle_price_range: self.vehicle_price_range.clone(),
            vehicle_age_years: self.vehicle_age_years as f64,
            past_number_of_claims: self.past_number_of_claims as f64,
            accident_area: self.accident_area.clone(),
            police_report_filed: yes_no(self.police_report_filed),
            witness_present: yes_no(self.witness_present),
            agent_type: self.agent_type.clone(),
            claim_amendments: self.claim_amendments as f64,
            address_change_linked_to_claim: yes_no(self.address_change_linked_to_claim),
            fraud_percentage_estimate: self.fraud_percentage_estimate,
            fraud_type: self.fraud_type.clone(),
            high_risk_combination: yes_no(self.high_risk_combination),
            region: self.region.clone(),
            employment_status: self.employment_status.clone(),
            claim_amount_range: self.claim_amount_range.clone(),
            payout_to_claim_ratio: self.payout_to_claim_ratio,
            claim_channel: self.claim_channel.clone(),
            weather_condition: self.weather_condition.clone(),
            accident_time: self.accident_time.clone(),
            repair_shop_pattern: self.repair_shop_pattern.clone(),
        }
    }

    pub async fn create(pool: &PgPool, data: &CreateClaim) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Claim>(
            r#"
            INSERT INTO insurance_claims (
                claim_id, age_group, gender, marital_status, income_band,
                employment_status, address_change_last_6_months, deductible_level,
                days_policy_accident, days_policy_claim, past_number_of_claims,
                vehicle_category, vehicle_price_range, vehicle_age_years,
                accident_area, police_report_filed, witness_present,
                weather_condition, accident_time, agent_type, claim_amendments,
                address_change_linked_to_claim, claim_amount_range,
                payout_to_claim_ratio, claim_channel, repair_shop_pattern,
                fraud_percentage_estimate, fraud_type, high_risk_combination, region
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
                $21, $22, $23, $24, $25, $26, $27, $28, $29, $30
            )
            RETURNING *
            "#,
        )
        .bind(&data.claim_id)
        .bind(&data.age_group)
        .bind(&data.gender)
        .bind(&data.marital_status)
        .bind(&data.income_band)
        .bind(&data.employment_status)
        .bind(data.address_change_last_6_months)
        .bind(&data.deductible_level)
        .bind(data.days_policy_accident)
        .bind(data.days_policy_claim)
        .bind(data.past_number_of_claims)
        .bind(&data.vehicle_category)
        .bind(&data.vehicle_price_range)
        .bind(data.vehicle_age_years)
        .bind(&data.accident_area)
        .bind(data.police_report_filed)
        .bind(data.witness_present)
        .bind(&data.weather_condition)
        .bind(&data.accident_time)
        .bind(&data.agent_type)
        .bind(data.claim_amendments)
        .bind(data.address_change_linked_to_claim)
        .bind(&data.claim_amount_range)
        .bind(data.payout_to_claim_ratio)
        .bind(&data.claim_channel)
        .bind(&data.repair_shop_pattern)
        .bind(data.fraud_percentage_estimate)
        .bind(&data.fraud_type)
        .bind(data.high_risk_combination)
        .bind(&data.region)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_claim_id(pool: &PgPool, claim_id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Claim>("SELECT * FROM insurance_claims WHERE claim_id = $1")
            .bind(claim_id)
            .fetch_optional(pool)
            .await
    }
}

const CLAIM_WITH_PREDICTION_SELECT: &str = r#"
    SELECT ic.*, fp.fraud_prediction, fp.fraud_probability, fp.risk_level,
           fp.model_used, fp.created_at AS prediction_date
    FROM insurance_claims ic
    LEFT JOIN fraud_predictions fp ON ic.claim_id = fp.claim_id
"#;

impl ClaimWithPrediction {
    pub async fn find(pool: &PgPool, claim_id: &str) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("{} WHERE ic.claim_id = $1", CLAIM_WITH_PREDICTION_SELECT);
        sqlx::query_as::<_, ClaimWithPrediction>(&sql)
            .bind(claim_id)
            .fetch_optional(pool)
            .await
    }

    /// `risk_level` must already be the stored label ("HIGH RISK")
    pub async fn list(
        pool: &PgPool,
        risk_level: Option<&str>,
        region: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "{} WHERE ($1::TEXT IS NULL OR fp.risk_level = $1) AND ($2::TEXT IS NULL OR ic.region = $2) \
             ORDER BY ic.created_at DESC LIMIT $3 OFFSET $4",
            CLAIM_WITH_PREDICTION_SELECT
        );
        sqlx::query_as::<_, ClaimWithPrediction>(&sql)
            .bind(risk_level)
            .bind(region)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, risk_level: Option<&str>, region: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM insurance_claims ic
            LEFT JOIN fraud_predictions fp ON ic.claim_id = fp.claim_id
            WHERE ($1::TEXT IS NULL OR fp.risk_level = $1) AND ($2::TEXT IS NULL OR ic.region = $2)
            "#,
        )
        .bind(risk_level)
        .bind(region)
        .fetch_one(pool)
        .await
    }

    /// Every claim, newest first, for report export
    pub async fn all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("{} ORDER BY ic.created_at DESC", CLAIM_WITH_PREDICTION_SELECT);
        sqlx::query_as::<_, ClaimWithPrediction>(&sql).fetch_all(pool).await
    }
}

#[cfg(test)]
impl Claim {
    /// Stored form of the reference sample claim
    pub fn fixture(claim_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: 1,
            claim_id: claim_id.to_string(),
            age_group: "26-35".into(),
            gender: "Male".into(),
            marital_status: "Married".into(),
            income_band: "15001-30000".into(),
            employment_status: "Employed".into(),
            address_change_last_6_months: false,
            deductible_level: "Medium".into(),
            days_policy_accident: 150,
            days_policy_claim: 200,
            past_number_of_claims: 1,
            vehicle_category: "SUV".into(),
            vehicle_price_range: "100k-250k".into(),
            vehicle_age_years: 5,
            accident_area: "Urban".into(),
            police_report_filed: true,
            witness_present: true,
            weather_condition: "Clear".into(),
            accident_time: "Morning".into(),
            agent_type: "Internal".into(),
            claim_amendments: 0,
            address_change_linked_to_claim: false,
            claim_amount_range: "10k-50k".into(),
            payout_to_claim_ratio: 0.75,
            claim_channel: "Agent".into(),
            repair_shop_pattern: "One-time".into(),
            fraud_percentage_estimate: 15.5,
            fraud_type: "None".into(),
            high_risk_combination: false,
            region: "Khomas".into(),
            created_at: now,
            updated_at: now,
        }
    }
}
