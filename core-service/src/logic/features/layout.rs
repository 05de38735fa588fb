//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the engineered feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature or change its kind → increment FEATURE_VERSION
//!
//! A trained artifact stores the names, version and hash it was fitted with.
//! Any disagreement with this file at inference time is schema drift.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::logic::claim::{ColumnKind, ColumnSpec, RAW_COLUMNS};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Engineered columns in exact vector order: the 30 raw claim columns
/// followed by the 15 derived risk indicators.
pub const FEATURE_LAYOUT: &[ColumnSpec] = &[
    // === Raw claim columns (0-29) ===
    ColumnSpec::categorical("AgeGroup"),
    ColumnSpec::categorical("Gender"),
    ColumnSpec::categorical("MaritalStatus"),
    ColumnSpec::categorical("IncomeBand"),
    ColumnSpec::categorical("AddressChange_Last6Months"),
    ColumnSpec::categorical("PolicyType"),
    ColumnSpec::categorical("DeductibleLevel"),
    ColumnSpec::numeric("Days_Policy_Accident"),
    ColumnSpec::numeric("Days_Policy_Claim"),
    ColumnSpec::categorical("VehicleCategory"),
    ColumnSpec::categorical("VehiclePriceRange"),
    ColumnSpec::numeric("VehicleAge(In Years)"),
    ColumnSpec::numeric("PastNumberOfClaims"),
    ColumnSpec::categorical("AccidentArea"),
    ColumnSpec::categorical("PoliceReportFiled"),
    ColumnSpec::categorical("WitnessPresent"),
    ColumnSpec::categorical("AgentType"),
    ColumnSpec::numeric("ClaimAmendments"),
    ColumnSpec::categorical("AddressChange_LinkedToClaim"),
    ColumnSpec::numeric("FraudPercentageEstimate"),
    ColumnSpec::categorical("FraudType"),
    ColumnSpec::categorical("HighRiskCombination"),
    ColumnSpec::categorical("Region"),
    ColumnSpec::categorical("EmploymentStatus"),
    ColumnSpec::categorical("ClaimAmountRange"),
    ColumnSpec::numeric("PayoutToClaimRatio"),
    ColumnSpec::categorical("ClaimChannel"),
    ColumnSpec::categorical("WeatherCondition"),
    ColumnSpec::categorical("AccidentTime"),
    ColumnSpec::categorical("RepairShopPattern"),

    // === Profile flags (30-35) ===
    ColumnSpec::numeric("HighRiskAge"),          // 30: age group 18-25 or 60+
    ColumnSpec::numeric("LowIncome"),            // 31: income below 15000
    ColumnSpec::numeric("VulnerableEmployment"), // 32: unemployed or student
    ColumnSpec::numeric("MultipleClaims"),       // 33: more than 2 past claims
    ColumnSpec::numeric("RecentAddressChange"),  // 34: moved in the last 6 months
    ColumnSpec::numeric("RiskScore"),            // 35: sum of 30-34

    // === Claim indicators (36-43) ===
    ColumnSpec::numeric("ClaimToPolicyRatio"),   // 36: claim days / (accident days + 1)
    ColumnSpec::numeric("VehicleAgeRisk"),       // 37: 0/1/2
    ColumnSpec::numeric("ClaimAmountRisk"),      // 38: 0/1/2
    ColumnSpec::numeric("PayoutRatioRisk"),      // 39: 0/1/2
    ColumnSpec::numeric("FraudTypeRisk"),        // 40: 0/1/2
    ColumnSpec::numeric("RegionRisk"),           // 41: static region table
    ColumnSpec::numeric("AccidentTimeRisk"),     // 42: night or evening
    ColumnSpec::numeric("WeatherRisk"),          // 43: foggy or windy

    // === Combined (44) ===
    ColumnSpec::numeric("CombinedRiskScore"),    // 44: 35 + 37..=43
];

/// Total number of engineered features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 45;

/// Number of leading layout entries copied straight from the claim
pub const RAW_FEATURE_COUNT: usize = 30;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of a named, typed layout
fn hash_columns<'a>(version: u8, columns: impl Iterator<Item = (&'a str, ColumnKind)>) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[version]);

    for (name, kind) in columns {
        hasher.update(name.as_bytes());
        hasher.update(&[0, kind.tag(), 0]);
    }

    hasher.finalize()
}

/// Hash of the current layout, used to detect mismatches at runtime
pub fn layout_hash() -> u32 {
    hash_columns(FEATURE_VERSION, FEATURE_LAYOUT.iter().map(|c| (c.name, c.kind)))
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: feature_names(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Engineered feature set disagrees with what an artifact was trained on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutMismatch {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub expected_count: usize,
    pub actual_version: u8,
    pub actual_hash: u32,
    pub actual_count: usize,
    /// First position where the name lists disagree
    pub first_difference: Option<usize>,
}

impl std::fmt::Display for LayoutMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: artifact expects v{} ({} features, hash: {:08x}), engineer produces v{} ({} features, hash: {:08x})",
            self.expected_version,
            self.expected_count,
            self.expected_hash,
            self.actual_version,
            self.actual_count,
            self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatch {}

/// Check an artifact's stored feature ordering against the live layout.
///
/// "Expected" is what the artifact was trained with, "actual" is what the
/// current feature engineer produces.
pub fn validate_feature_names(
    names: &[String],
    version: u8,
    hash: u32,
) -> Result<(), LayoutMismatch> {
    let current_hash = layout_hash();

    let first_difference = names
        .iter()
        .map(String::as_str)
        .zip(FEATURE_LAYOUT.iter().map(|c| c.name))
        .position(|(a, b)| a != b)
        .or_else(|| (names.len() != FEATURE_COUNT).then(|| names.len().min(FEATURE_COUNT)));

    if version != FEATURE_VERSION || hash != current_hash || first_difference.is_some() {
        return Err(LayoutMismatch {
            expected_version: version,
            expected_hash: hash,
            expected_count: names.len(),
            actual_version: FEATURE_VERSION,
            actual_hash: current_hash,
            actual_count: FEATURE_COUNT,
            first_difference,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|c| c.name == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).map(|c| c.name)
}

/// Owned copy of the layout names
pub fn feature_names() -> Vec<String> {
    FEATURE_LAYOUT.iter().map(|c| c.name.to_string()).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_raw_prefix_matches_claim_schema() {
        assert_eq!(RAW_COLUMNS.len(), RAW_FEATURE_COUNT);
        assert_eq!(&FEATURE_LAYOUT[..RAW_FEATURE_COUNT], RAW_COLUMNS);
    }

    #[test]
    fn test_derived_features_are_numeric() {
        assert!(FEATURE_LAYOUT[RAW_FEATURE_COUNT..]
            .iter()
            .all(|c| c.kind == ColumnKind::Numeric));
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_layout_hash_depends_on_kind() {
        let flipped = FEATURE_LAYOUT.iter().enumerate().map(|(i, c)| {
            let kind = if i == 0 { ColumnKind::Numeric } else { c.kind };
            (c.name, kind)
        });
        assert_ne!(hash_columns(FEATURE_VERSION, flipped), layout_hash());
    }

    #[test]
    fn test_validate_feature_names_success() {
        let result = validate_feature_names(&feature_names(), FEATURE_VERSION, layout_hash());
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_feature_names_missing_column() {
        let mut names = feature_names();
        names.pop();
        let err = validate_feature_names(&names, FEATURE_VERSION, layout_hash()).unwrap_err();
        assert_eq!(err.expected_count, FEATURE_COUNT - 1);
        assert_eq!(err.actual_count, FEATURE_COUNT);
        assert_eq!(err.first_difference, Some(FEATURE_COUNT - 1));
    }

    #[test]
    fn test_validate_feature_names_reordered() {
        let mut names = feature_names();
        names.swap(0, 1);
        let err = validate_feature_names(&names, FEATURE_VERSION, layout_hash()).unwrap_err();
        assert_eq!(err.first_difference, Some(0));
    }

    #[test]
    fn test_validate_feature_names_version_mismatch() {
        let result = validate_feature_names(&feature_names(), FEATURE_VERSION + 1, layout_hash());
        assert!(result.is_err());
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("AgeGroup"), Some(0));
        assert_eq!(feature_index("CombinedRiskScore"), Some(44));
        assert_eq!(feature_index("FirstName"), None);
        assert_eq!(feature_name(35), Some("RiskScore"));
        assert_eq!(feature_name(100), None);
    }
}
