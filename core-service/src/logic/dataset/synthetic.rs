//! Deterministic synthetic claims for tests and demos
//!
//! Attributes are drawn uniformly from the categories seen in the canonical
//! dataset. The fraud label is drawn with the heuristic probability of the
//! claim, so labels correlate with the risk indicators without being a pure
//! function of them.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::record::LabeledClaim;
use crate::logic::claim::ClaimRecord;
use crate::logic::heuristic;

const AGE_GROUPS: &[&str] = &["18-25", "26-35", "36-45", "46-59", "60+"];
const GENDERS: &[&str] = &["Male", "Female"];
const MARITAL_STATUSES: &[&str] = &["Single", "Married", "Divorced", "Widowed"];
const INCOME_BANDS: &[&str] = &["<5000", "5000-15000", "15001-30000", "30001-50000", "50000+"];
const YES_NO: &[&str] = &["Yes", "No"];
const POLICY_TYPES: &[&str] = &["Vehicle", "Property", "Life", "Health"];
const DEDUCTIBLE_LEVELS: &[&str] = &["Low", "Medium", "High"];
const VEHICLE_CATEGORIES: &[&str] = &["Sedan", "SUV", "Truck", "Hatchback", "Bakkie"];
const VEHICLE_PRICE_RANGES: &[&str] = &["<50k", "50k-100k", "100k-250k", "250k+"];
const ACCIDENT_AREAS: &[&str] = &["Urban", "Rural"];
const AGENT_TYPES: &[&str] = &["Internal", "External"];
const FRAUD_TYPES: &[&str] = &["None", "Inflated Claim", "Staged Accident", "False Documents", "Unknown"];
const REGIONS: &[&str] = &["Khomas", "Erongo", "Oshana", "Otjozondjupa", "Hardap", "Kavango East", "Zambezi"];
const EMPLOYMENT_STATUSES: &[&str] = &["Employed", "Self-Employed", "Unemployed", "Student", "Retired"];
const CLAIM_AMOUNT_RANGES: &[&str] = &["<10k", "10k-50k", "50k-100k", "100k+"];
const CLAIM_CHANNELS: &[&str] = &["Agent", "Online", "Branch", "Phone"];
const WEATHER_CONDITIONS: &[&str] = &["Clear", "Rainy", "Foggy", "Windy"];
const ACCIDENT_TIMES: &[&str] = &["Morning", "Afternoon", "Evening", "Night"];
const REPAIR_SHOP_PATTERNS: &[&str] = &["One-time", "Repeated", "Preferred"];

fn pick(rng: &mut StdRng, options: &[&str]) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}

/// Round to one decimal place
fn tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn random_claim(rng: &mut StdRng) -> ClaimRecord {
    let days_policy_accident = f64::from(rng.gen_range(0..730u32));

    ClaimRecord {
        age_group: pick(rng, AGE_GROUPS),
        gender: pick(rng, GENDERS),
        marital_status: pick(rng, MARITAL_STATUSES),
        income_band: pick(rng, INCOME_BANDS),
        address_change_last_6_months: pick(rng, YES_NO),
        policy_type: pick(rng, POLICY_TYPES),
        deductible_level: pick(rng, DEDUCTIBLE_LEVELS),
        days_policy_accident,
        days_policy_claim: days_policy_accident + f64::from(rng.gen_range(0..60u32)),
        vehicle_category: pick(rng, VEHICLE_CATEGORIES),
        vehicle_price_range: pick(rng, VEHICLE_PRICE_RANGES),
        vehicle_age_years: f64::from(rng.gen_range(0..21u32)),
        past_number_of_claims: f64::from(rng.gen_range(0..6u32)),
        accident_area: pick(rng, ACCIDENT_AREAS),
        police_report_filed: pick(rng, YES_NO),
        witness_present: pick(rng, YES_NO),
        agent_type: pick(rng, AGENT_TYPES),
        claim_amendments: f64::from(rng.gen_range(0..7u32)),
        address_change_linked_to_claim: pick(rng, YES_NO),
        fraud_percentage_estimate: tenth(rng.gen_range(0.0..100.0)),
        fraud_type: pick(rng, FRAUD_TYPES),
        high_risk_combination: pick(rng, YES_NO),
        region: pick(rng, REGIONS),
        employment_status: pick(rng, EMPLOYMENT_STATUSES),
        claim_amount_range: pick(rng, CLAIM_AMOUNT_RANGES),
        payout_to_claim_ratio: (rng.gen_range(0.3..1.0f64) * 100.0).round() / 100.0,
        claim_channel: pick(rng, CLAIM_CHANNELS),
        weather_condition: pick(rng, WEATHER_CONDITIONS),
        accident_time: pick(rng, ACCIDENT_TIMES),
        repair_shop_pattern: pick(rng, REPAIR_SHOP_PATTERNS),
    }
}

/// Generate `n` labeled claims; the same seed always yields the same rows
pub fn generate(n: usize, seed: u64) -> Vec<LabeledClaim> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..n)
        .map(|_| {
            let claim = random_claim(&mut rng);
            let p = heuristic::score(&claim).probability;
            let fraud = rng.gen_bool(p);
            LabeledClaim::new(claim, fraud)
        })
        .collect()
}
