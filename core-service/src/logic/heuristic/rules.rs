//! Heuristic Rule Weights & Tiers
//!
//! Constants only. Evaluation order and scoring live in `scorer.rs`.

// ============================================================================
// RULE CONDITIONS
// ============================================================================

pub const RISKY_AGE_GROUPS: &[&str] = &["18-25", "60+"];
pub const RISKY_INCOME_BANDS: &[&str] = &["<5000", "5000-15000"];

/// Past claims: (more than, points)
pub const PAST_CLAIMS_MANY: (f64, u32) = (2.0, 2);
pub const PAST_CLAIMS_ANY: (f64, u32) = (0.0, 1);

/// Claim amendments: (more than, points)
pub const AMENDMENTS_MANY: (f64, u32) = (3.0, 2);
pub const AMENDMENTS_ANY: (f64, u32) = (0.0, 1);

/// Fraud percentage estimate: (more than, points)
pub const FRAUD_ESTIMATE_HIGH: (f64, u32) = (70.0, 3);
pub const FRAUD_ESTIMATE_MODERATE: (f64, u32) = (30.0, 1);

/// Vehicle age in years: (more than, points)
pub const OLD_VEHICLE: (f64, u32) = (15.0, 1);

pub const AGE_POINTS: u32 = 1;
pub const INCOME_POINTS: u32 = 1;
pub const ADDRESS_CHANGE_POINTS: u32 = 1;
pub const ADDRESS_LINKED_POINTS: u32 = 1;
pub const HIGH_RISK_COMBINATION_POINTS: u32 = 2;

// ============================================================================
// REASONS
// ============================================================================

pub const REASON_AGE: &str = "High-risk age group";
pub const REASON_INCOME: &str = "Low income";
pub const REASON_MANY_CLAIMS: &str = "Multiple past claims";
pub const REASON_PREVIOUS_CLAIMS: &str = "Previous claims";
pub const REASON_MANY_AMENDMENTS: &str = "Multiple claim amendments";
pub const REASON_AMENDMENTS: &str = "Claim amendments";
pub const REASON_ADDRESS_CHANGE: &str = "Recent address change";
pub const REASON_ADDRESS_LINKED: &str = "Address change linked to claim";
pub const REASON_HIGH_ESTIMATE: &str = "High fraud estimate";
pub const REASON_MODERATE_ESTIMATE: &str = "Moderate fraud estimate";
pub const REASON_COMBINATION: &str = "High risk combination";
pub const REASON_OLD_VEHICLE: &str = "Old vehicle";

// ============================================================================
// SCORE TIERS
// ============================================================================

/// Raw score at or above which a claim is HIGH risk and flagged as fraud
pub const HIGH_SCORE: u32 = 7;

/// Raw score at or above which a claim is MEDIUM risk
pub const MEDIUM_SCORE: u32 = 4;

/// `p = base + step * (score - floor)` per tier
pub const HIGH_TIER: (f64, f64) = (0.85, 0.02);
pub const MEDIUM_TIER: (f64, f64) = (0.60, 0.08);
pub const LOW_TIER: (f64, f64) = (0.20, 0.10);
