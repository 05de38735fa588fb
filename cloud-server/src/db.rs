//! Database module - PostgreSQL connection and migrations

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Insurance claims (collaborator claim store)
CREATE TABLE IF NOT EXISTS insurance_claims (
    id SERIAL PRIMARY KEY,
    claim_id VARCHAR(50) UNIQUE NOT NULL,
    age_group VARCHAR(20) NOT NULL,
    gender VARCHAR(10) NOT NULL,
    marital_status VARCHAR(20) NOT NULL,
    income_band VARCHAR(20) NOT NULL,
    employment_status VARCHAR(20) NOT NULL,
    address_change_last_6_months BOOLEAN NOT NULL,
    deductible_level VARCHAR(10) NOT NULL,
    days_policy_accident INTEGER NOT NULL,
    days_policy_claim INTEGER NOT NULL,
    past_number_of_claims INTEGER NOT NULL,
    vehicle_category VARCHAR(20) NOT NULL,
    vehicle_price_range VARCHAR(20) NOT NULL,
    vehicle_age_years INTEGER NOT NULL,
    accident_area VARCHAR(20) NOT NULL,
    police_report_filed BOOLEAN NOT NULL,
    witness_present BOOLEAN NOT NULL,
    weather_condition VARCHAR(20) NOT NULL,
    accident_time VARCHAR(20) NOT NULL,
    agent_type VARCHAR(20) NOT NULL,
    claim_amendments INTEGER NOT NULL,
    address_change_linked_to_claim BOOLEAN NOT NULL,
    claim_amount_range VARCHAR(20) NOT NULL,
    payout_to_claim_ratio DOUBLE PRECISION NOT NULL,
    claim_channel VARCHAR(20) NOT NULL,
    repair_shop_pattern VARCHAR(20) NOT NULL,
    fraud_percentage_estimate DOUBLE PRECISION NOT NULL,
    fraud_type VARCHAR(30) NOT NULL,
    high_risk_combination BOOLEAN NOT NULL,
    region VARCHAR(30) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Fraud predictions (result sink), one per claim
CREATE TABLE IF NOT EXISTS fraud_predictions (
    id SERIAL PRIMARY KEY,
    claim_id VARCHAR(50) NOT NULL UNIQUE REFERENCES insurance_claims(claim_id) ON DELETE CASCADE,
    fraud_prediction BOOLEAN NOT NULL,
    fraud_probability DOUBLE PRECISION NOT NULL,
    risk_level VARCHAR(20) NOT NULL,
    model_used VARCHAR(50) NOT NULL,
    prediction_confidence DOUBLE PRECISION,
    risk_factors JSONB,
    raw_score INTEGER,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Training runs
CREATE TABLE IF NOT EXISTS model_performance (
    id SERIAL PRIMARY KEY,
    model_name VARCHAR(50) NOT NULL,
    artifact_id VARCHAR(64),
    accuracy DOUBLE PRECISION NOT NULL,
    precision_score DOUBLE PRECISION NOT NULL,
    recall_score DOUBLE PRECISION NOT NULL,
    f1_score DOUBLE PRECISION NOT NULL,
    roc_auc DOUBLE PRECISION,
    training_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    dataset_size INTEGER NOT NULL,
    fraud_cases INTEGER NOT NULL,
    non_fraud_cases INTEGER NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_claims_created_at ON insurance_claims(created_at);
CREATE INDEX IF NOT EXISTS idx_claims_region ON insurance_claims(region);
CREATE INDEX IF NOT EXISTS idx_predictions_risk_level ON fraud_predictions(risk_level);
CREATE INDEX IF NOT EXISTS idx_predictions_created_at ON fraud_predictions(created_at);
CREATE INDEX IF NOT EXISTS idx_performance_training_date ON model_performance(training_date);
CREATE UNIQUE INDEX IF NOT EXISTS idx_performance_artifact ON model_performance(artifact_id);
"#;
