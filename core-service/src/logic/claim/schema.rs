//! Declared Claim Schema
//!
//! **This file controls which raw claim columns exist and how they are typed.**
//!
//! Training and inference both read column roles from here. Nothing inspects
//! runtime value types to decide whether a column is categorical or numeric.

use serde::{Deserialize, Serialize};

// ============================================================================
// COLUMN TYPES
// ============================================================================

/// Role of a column in the encoder/scaler stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// String-valued, mapped through a code table
    Categorical,
    /// Numeric, standardized with training mean/std
    Numeric,
}

impl ColumnKind {
    pub fn tag(&self) -> u8 {
        match self {
            ColumnKind::Categorical => b'C',
            ColumnKind::Numeric => b'N',
        }
    }
}

/// One declared column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub const fn categorical(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Categorical }
    }

    pub const fn numeric(name: &'static str) -> Self {
        Self { name, kind: ColumnKind::Numeric }
    }
}

/// A single typed cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(String),
}

impl FeatureValue {
    pub fn kind(&self) -> ColumnKind {
        match self {
            FeatureValue::Numeric(_) => ColumnKind::Numeric,
            FeatureValue::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Numeric(v) => Some(*v),
            FeatureValue::Categorical(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Categorical(s) => Some(s.as_str()),
            FeatureValue::Numeric(_) => None,
        }
    }
}

// ============================================================================
// RAW COLUMNS (Authoritative source)
// ============================================================================

/// Raw claim columns in canonical dataset order.
/// Personal identifiers and the label are deliberately absent.
pub const RAW_COLUMNS: &[ColumnSpec] = &[
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
];

/// Dataset columns that are never used as features
pub const PERSONAL_COLUMNS: &[&str] = &["FirstName", "LastName", "CellNumber", "IDNumber"];

/// Look up a raw column by name
pub fn raw_column(name: &str) -> Option<&'static ColumnSpec> {
    RAW_COLUMNS.iter().find(|c| c.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_raw_column_names_unique() {
        let names: HashSet<_> = RAW_COLUMNS.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), RAW_COLUMNS.len());
    }

    #[test]
    fn test_personal_columns_not_in_schema() {
        for name in PERSONAL_COLUMNS {
            assert!(raw_column(name).is_none());
        }
        assert!(raw_column(crate::constants::LABEL_COLUMN).is_none());
    }

    #[test]
    fn test_raw_column_lookup() {
        assert_eq!(raw_column("Region").map(|c| c.kind), Some(ColumnKind::Categorical));
        assert_eq!(raw_column("PastNumberOfClaims").map(|c| c.kind), Some(ColumnKind::Numeric));
        assert!(raw_column("Nope").is_none());
    }
}
