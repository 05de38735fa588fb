//! Feature Engineer - derives risk indicators from a raw claim
//!
//! Pure and deterministic: the same claim always produces the same vector,
//! so training and inference see identical features.

use serde::{Deserialize, Serialize};

use super::layout::RAW_FEATURE_COUNT;
use super::vector::EngineeredFeatures;
use crate::logic::claim::{ClaimRecord, FeatureValue};

// ============================================================================
// LOOKUP TABLES
// ============================================================================

pub const HIGH_RISK_AGE_GROUPS: &[&str] = &["18-25", "60+"];
pub const LOW_INCOME_BANDS: &[&str] = &["<5000", "5000-15000"];
pub const VULNERABLE_EMPLOYMENT: &[&str] = &["Unemployed", "Student"];

/// Past claims strictly above this count raise `MultipleClaims`
pub const MULTIPLE_CLAIMS_ABOVE: f64 = 2.0;

/// Vehicle age tiers (years, strictly greater than)
pub const VEHICLE_AGE_TIERS: (f64, f64) = (10.0, 15.0);

/// Payout-to-claim ratio tiers (strictly greater than)
pub const PAYOUT_RATIO_TIERS: (f64, f64) = (0.8, 0.9);

/// Claim amount range → risk tier
pub const CLAIM_AMOUNT_RISK: &[(&str, u8)] = &[("50k-100k", 1), ("100k+", 2)];

/// Fraud type → risk tier
pub const FRAUD_TYPE_RISK: &[(&str, u8)] = &[
    ("Inflated Claim", 1),
    ("Staged Accident", 2),
    ("False Documents", 2),
];

/// Region → risk. Regions not listed score 0.
pub const REGION_RISK: &[(&str, u8)] = &[
    ("Khomas", 1),
    ("Otjozondjupa", 1),
    ("Hardap", 1),
    ("Erongo", 0),
    ("Oshana", 0),
];

pub const RISKY_ACCIDENT_TIMES: &[&str] = &["Night", "Evening"];
pub const ADVERSE_WEATHER: &[&str] = &["Foggy", "Windy"];

fn lookup(table: &[(&str, u8)], key: &str) -> u8 {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(0)
}

fn flag(condition: bool) -> u8 {
    u8::from(condition)
}

fn tier(value: f64, (low, high): (f64, f64)) -> u8 {
    if value > high {
        2
    } else if value > low {
        1
    } else {
        0
    }
}

// ============================================================================
// DERIVED FEATURES
// ============================================================================

/// The derived half of the engineered vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    pub high_risk_age: u8,
    pub low_income: u8,
    pub vulnerable_employment: u8,
    pub multiple_claims: u8,
    pub recent_address_change: u8,
    pub risk_score: u8,
    pub claim_to_policy_ratio: f64,
    pub vehicle_age_risk: u8,
    pub claim_amount_risk: u8,
    pub payout_ratio_risk: u8,
    pub fraud_type_risk: u8,
    pub region_risk: u8,
    pub accident_time_risk: u8,
    pub weather_risk: u8,
    pub combined_risk_score: u8,
}

impl DerivedFeatures {
    pub fn from_claim(claim: &ClaimRecord) -> Self {
        let high_risk_age = flag(HIGH_RISK_AGE_GROUPS.contains(&claim.age_group.as_str()));
        let low_income = flag(LOW_INCOME_BANDS.contains(&claim.income_band.as_str()));
        let vulnerable_employment =
            flag(VULNERABLE_EMPLOYMENT.contains(&claim.employment_status.as_str()));
        let multiple_claims = flag(claim.past_number_of_claims > MULTIPLE_CLAIMS_ABOVE);
        let recent_address_change = flag(claim.address_change_last_6_months == "Yes");

        let risk_score =
            high_risk_age + low_income + vulnerable_employment + multiple_claims + recent_address_change;

        let claim_to_policy_ratio = claim.days_policy_claim / (claim.days_policy_accident + 1.0);

        let vehicle_age_risk = tier(claim.vehicle_age_years, VEHICLE_AGE_TIERS);
        let claim_amount_risk = lookup(CLAIM_AMOUNT_RISK, &claim.claim_amount_range);
        let payout_ratio_risk = tier(claim.payout_to_claim_ratio, PAYOUT_RATIO_TIERS);
        let fraud_type_risk = lookup(FRAUD_TYPE_RISK, &claim.fraud_type);
        let region_risk = lookup(REGION_RISK, &claim.region);
        let accident_time_risk = flag(RISKY_ACCIDENT_TIMES.contains(&claim.accident_time.as_str()));
        let weather_risk = flag(ADVERSE_WEATHER.contains(&claim.weather_condition.as_str()));

        let combined_risk_score = risk_score
            + vehicle_age_risk
            + claim_amount_risk
            + payout_ratio_risk
            + fraud_type_risk
            + region_risk
            + accident_time_risk
            + weather_risk;

        Self {
            high_risk_age,
            low_income,
            vulnerable_employment,
            multiple_claims,
            recent_address_change,
            risk_score,
            claim_to_policy_ratio,
            vehicle_age_risk,
            claim_amount_risk,
            payout_ratio_risk,
            fraud_type_risk,
            region_risk,
            accident_time_risk,
            weather_risk,
            combined_risk_score,
        }
    }

    /// Values in layout order (positions 30..45)
    pub fn to_values(&self) -> [f64; 15] {
        [
            f64::from(self.high_risk_age),
            f64::from(self.low_income),
            f64::from(self.vulnerable_employment),
            f64::from(self.multiple_claims),
            f64::from(self.recent_address_change),
            f64::from(self.risk_score),
            self.claim_to_policy_ratio,
            f64::from(self.vehicle_age_risk),
            f64::from(self.claim_amount_risk),
            f64::from(self.payout_ratio_risk),
            f64::from(self.fraud_type_risk),
            f64::from(self.region_risk),
            f64::from(self.accident_time_risk),
            f64::from(self.weather_risk),
            f64::from(self.combined_risk_score),
        ]
    }
}

// ============================================================================
// ENGINEER
// ============================================================================

/// Raw claim fields followed by derived indicators, in layout order
pub fn engineer(claim: &ClaimRecord) -> EngineeredFeatures {
    let derived = DerivedFeatures::from_claim(claim);

    let mut values = claim.raw_values();
    debug_assert_eq!(values.len(), RAW_FEATURE_COUNT);
    values.extend(derived.to_values().into_iter().map(FeatureValue::Numeric));

    EngineeredFeatures::from_values(values)
}
