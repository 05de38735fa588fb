//! Heuristic Scorer
//!
//! Model-free and explainable. Rules are evaluated in a fixed order; each
//! hit adds points and a reason. Reasons keep evaluation order.

use serde::Serialize;

use super::rules::*;
use crate::constants::{HEURISTIC_MAX_PROBABILITY, HEURISTIC_MIN_PROBABILITY};
use crate::logic::claim::ClaimRecord;
use crate::logic::model::RiskLevel;
use crate::logic::prediction::{PredictionResult, ScoringMethod};

/// One triggered rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleHit {
    pub points: u32,
    pub reason: &'static str,
}

/// Two-tier rule: the higher tier wins, at most one fires
fn tiered(value: f64, high: (f64, u32), low: (f64, u32), reasons: (&'static str, &'static str)) -> Option<RuleHit> {
    if value > high.0 {
        Some(RuleHit { points: high.1, reason: reasons.0 })
    } else if value > low.0 {
        Some(RuleHit { points: low.1, reason: reasons.1 })
    } else {
        None
    }
}

fn when(condition: bool, points: u32, reason: &'static str) -> Option<RuleHit> {
    condition.then_some(RuleHit { points, reason })
}

/// Triggered rules in evaluation order
pub fn evaluate(claim: &ClaimRecord) -> Vec<RuleHit> {
    [
        when(RISKY_AGE_GROUPS.contains(&claim.age_group.as_str()), AGE_POINTS, REASON_AGE),
        when(RISKY_INCOME_BANDS.contains(&claim.income_band.as_str()), INCOME_POINTS, REASON_INCOME),
        tiered(
            claim.past_number_of_claims,
            PAST_CLAIMS_MANY,
            PAST_CLAIMS_ANY,
            (REASON_MANY_CLAIMS, REASON_PREVIOUS_CLAIMS),
        ),
        tiered(
            claim.claim_amendments,
            AMENDMENTS_MANY,
            AMENDMENTS_ANY,
            (REASON_MANY_AMENDMENTS, REASON_AMENDMENTS),
        ),
        when(claim.address_change_last_6_months == "Yes", ADDRESS_CHANGE_POINTS, REASON_ADDRESS_CHANGE),
        when(claim.address_change_linked_to_claim == "Yes", ADDRESS_LINKED_POINTS, REASON_ADDRESS_LINKED),
        tiered(
            claim.fraud_percentage_estimate,
            FRAUD_ESTIMATE_HIGH,
            FRAUD_ESTIMATE_MODERATE,
            (REASON_HIGH_ESTIMATE, REASON_MODERATE_ESTIMATE),
        ),
        when(claim.high_risk_combination == "Yes", HIGH_RISK_COMBINATION_POINTS, REASON_COMBINATION),
        when(claim.vehicle_age_years > OLD_VEHICLE.0, OLD_VEHICLE.1, REASON_OLD_VEHICLE),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Piecewise score-to-probability map, clamped to [0.05, 0.95]
pub fn score_to_probability(score: u32) -> f64 {
    let (base, step, floor) = if score >= HIGH_SCORE {
        (HIGH_TIER.0, HIGH_TIER.1, HIGH_SCORE)
    } else if score >= MEDIUM_SCORE {
        (MEDIUM_TIER.0, MEDIUM_TIER.1, MEDIUM_SCORE)
    } else {
        (LOW_TIER.0, LOW_TIER.1, 0)
    };

    let p = base + step * f64::from(score - floor);
    p.clamp(HEURISTIC_MIN_PROBABILITY, HEURISTIC_MAX_PROBABILITY)
}

/// Risk band of a raw score
pub fn risk_level(score: u32) -> RiskLevel {
    if score >= HIGH_SCORE {
        RiskLevel::High
    } else if score >= MEDIUM_SCORE {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Score a claim with the rule table
pub fn score(claim: &ClaimRecord) -> PredictionResult {
    let hits = evaluate(claim);
    let raw_score: u32 = hits.iter().map(|h| h.points).sum();

    PredictionResult {
        prediction: raw_score >= HIGH_SCORE,
        probability: score_to_probability(raw_score),
        risk_level: risk_level(raw_score),
        risk_factors: Some(hits.iter().map(|h| h.reason.to_string()).collect()),
        raw_score: Some(raw_score),
        method: ScoringMethod::Heuristic,
    }
}
