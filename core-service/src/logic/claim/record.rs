//! Claim Record - immutable raw input to both scorers

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::schema::{raw_column, ColumnKind, FeatureValue, RAW_COLUMNS};

/// Placeholder for a claim without a recorded fraud type
pub const UNKNOWN_FRAUD_TYPE: &str = "Unknown";

/// Error building a record from a flat field map
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("missing column: {0}")]
    Missing(String),

    #[error("invalid numeric value '{value}' in column {column}")]
    InvalidNumber { column: String, value: String },

    #[error("negative value {value} in column {column}")]
    Negative { column: String, value: f64 },
}

/// One insurance claim, named by the canonical dataset columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    #[serde(rename = "AgeGroup")]
    pub age_group: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "MaritalStatus")]
    pub marital_status: String,
    #[serde(rename = "IncomeBand")]
    pub income_band: String,
    #[serde(rename = "AddressChange_Last6Months")]
    pub address_change_last_6_months: String,
    #[serde(rename = "PolicyType")]
    pub policy_type: String,
    #[serde(rename = "DeductibleLevel")]
    pub deductible_level: String,
    #[serde(rename = "Days_Policy_Accident")]
    pub days_policy_accident: f64,
    #[serde(rename = "Days_Policy_Claim")]
    pub days_policy_claim: f64,
    #[serde(rename = "VehicleCategory")]
    pub vehicle_category: String,
    #[serde(rename = "VehiclePriceRange")]
    pub vehicle_price_range: String,
    #[serde(rename = "VehicleAge(In Years)")]
    pub vehicle_age_years: f64,
    #[serde(rename = "PastNumberOfClaims")]
    pub past_number_of_claims: f64,
    #[serde(rename = "AccidentArea")]
    pub accident_area: String,
    #[serde(rename = "PoliceReportFiled")]
    pub police_report_filed: String,
    #[serde(rename = "WitnessPresent")]
    pub witness_present: String,
    #[serde(rename = "AgentType")]
    pub agent_type: String,
    #[serde(rename = "ClaimAmendments")]
    pub claim_amendments: f64,
    #[serde(rename = "AddressChange_LinkedToClaim")]
    pub address_change_linked_to_claim: String,
    #[serde(rename = "FraudPercentageEstimate")]
    pub fraud_percentage_estimate: f64,
    #[serde(rename = "FraudType", default = "unknown_fraud_type")]
    pub fraud_type: String,
    #[serde(rename = "HighRiskCombination")]
    pub high_risk_combination: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "EmploymentStatus")]
    pub employment_status: String,
    #[serde(rename = "ClaimAmountRange")]
    pub claim_amount_range: String,
    #[serde(rename = "PayoutToClaimRatio")]
    pub payout_to_claim_ratio: f64,
    #[serde(rename = "ClaimChannel")]
    pub claim_channel: String,
    #[serde(rename = "WeatherCondition")]
    pub weather_condition: String,
    #[serde(rename = "AccidentTime")]
    pub accident_time: String,
    #[serde(rename = "RepairShopPattern")]
    pub repair_shop_pattern: String,
}

fn unknown_fraud_type() -> String {
    UNKNOWN_FRAUD_TYPE.to_string()
}

impl ClaimRecord {
    /// Value of a raw column by its canonical name
    pub fn column_value(&self, name: &str) -> Option<FeatureValue> {
        use FeatureValue::{Categorical as C, Numeric as N};

        let value = match name {
            "AgeGroup" => C(self.age_group.clone()),
            "Gender" => C(self.gender.clone()),
            "MaritalStatus" => C(self.marital_status.clone()),
            "IncomeBand" => C(self.income_band.clone()),
            "AddressChange_Last6Months" => C(self.address_change_last_6_months.clone()),
            "PolicyType" => C(self.policy_type.clone()),
            "DeductibleLevel" => C(self.deductible_level.clone()),
            "Days_Policy_Accident" => N(self.days_policy_accident),
            "Days_Policy_Claim" => N(self.days_policy_claim),
            "VehicleCategory" => C(self.vehicle_category.clone()),
            "VehiclePriceRange" => C(self.vehicle_price_range.clone()),
            "VehicleAge(In Years)" => N(self.vehicle_age_years),
            "PastNumberOfClaims" => N(self.past_number_of_claims),
            "AccidentArea" => C(self.accident_area.clone()),
            "PoliceReportFiled" => C(self.police_report_filed.clone()),
            "WitnessPresent" => C(self.witness_present.clone()),
            "AgentType" => C(self.agent_type.clone()),
            "ClaimAmendments" => N(self.claim_amendments),
            "AddressChange_LinkedToClaim" => C(self.address_change_linked_to_claim.clone()),
            "FraudPercentageEstimate" => N(self.fraud_percentage_estimate),
            "FraudType" => C(self.fraud_type.clone()),
            "HighRiskCombination" => C(self.high_risk_combination.clone()),
            "Region" => C(self.region.clone()),
            "EmploymentStatus" => C(self.employment_status.clone()),
            "ClaimAmountRange" => C(self.claim_amount_range.clone()),
            "PayoutToClaimRatio" => N(self.payout_to_claim_ratio),
            "ClaimChannel" => C(self.claim_channel.clone()),
            "WeatherCondition" => C(self.weather_condition.clone()),
            "AccidentTime" => C(self.accident_time.clone()),
            "RepairShopPattern" => C(self.repair_shop_pattern.clone()),
            _ => return None,
        };

        Some(value)
    }

    /// Raw values in `RAW_COLUMNS` order
    pub fn raw_values(&self) -> Vec<FeatureValue> {
        RAW_COLUMNS
            .iter()
            .filter_map(|c| self.column_value(c.name))
            .collect()
    }

    /// Build a record from a flat string map keyed by canonical column name.
    ///
    /// Extra keys are ignored. A missing or blank `FraudType` becomes `Unknown`.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, FieldError> {
        let text = |name: &str| -> Result<String, FieldError> {
            match fields.get(name) {
                Some(v) => Ok(v.trim().to_string()),
                None => Err(FieldError::Missing(name.to_string())),
            }
        };

        let number = |name: &str| -> Result<f64, FieldError> {
            debug_assert_eq!(raw_column(name).map(|c| c.kind), Some(ColumnKind::Numeric));
            let raw = text(name)?;
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or(FieldError::InvalidNumber {
                    column: name.to_string(),
                    value: raw,
                })
        };

        // day counts, ages, tallies and ratios are all non-negative
        let count = |name: &str| -> Result<f64, FieldError> {
            let value = number(name)?;
            if value < 0.0 {
                return Err(FieldError::Negative { column: name.to_string(), value });
            }
            Ok(value)
        };

        let fraud_type = match fields.get("FraudType").map(|v| v.trim()) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => unknown_fraud_type(),
        };

        Ok(Self {
            age_group: text("AgeGroup")?,
            gender: text("Gender")?,
            marital_status: text("MaritalStatus")?,
            income_band: text("IncomeBand")?,
            address_change_last_6_months: text("AddressChange_Last6Months")?,
            policy_type: text("PolicyType")?,
            deductible_level: text("DeductibleLevel")?,
            days_policy_accident: count("Days_Policy_Accident")?,
            days_policy_claim: count("Days_Policy_Claim")?,
            vehicle_category: text("VehicleCategory")?,
            vehicle_price_range: text("VehiclePriceRange")?,
            vehicle_age_years: count("VehicleAge(In Years)")?,
            past_number_of_claims: count("PastNumberOfClaims")?,
            accident_area: text("AccidentArea")?,
            police_report_filed: text("PoliceReportFiled")?,
            witness_present: text("WitnessPresent")?,
            agent_type: text("AgentType")?,
            claim_amendments: count("ClaimAmendments")?,
            address_change_linked_to_claim: text("AddressChange_LinkedToClaim")?,
            fraud_percentage_estimate: count("FraudPercentageEstimate")?,
            fraud_type,
            high_risk_combination: text("HighRiskCombination")?,
            region: text("Region")?,
            employment_status: text("EmploymentStatus")?,
            claim_amount_range: text("ClaimAmountRange")?,
            payout_to_claim_ratio: count("PayoutToClaimRatio")?,
            claim_channel: text("ClaimChannel")?,
            weather_condition: text("WeatherCondition")?,
            accident_time: text("AccidentTime")?,
            repair_shop_pattern: text("RepairShopPattern")?,
        })
    }

    /// Flat string map keyed by canonical column name
    pub fn to_fields(&self) -> HashMap<String, String> {
        RAW_COLUMNS
            .iter()
            .filter_map(|c| {
                let value = match self.column_value(c.name)? {
                    FeatureValue::Numeric(v) => v.to_string(),
                    FeatureValue::Categorical(s) => s,
                };
                Some((c.name.to_string(), value))
            })
            .collect()
    }

    /// Reference claim used for smoke tests
    pub fn sample() -> Self {
        Self {
            age_group: "26-35".into(),
            gender: "Male".into(),
            marital_status: "Married".into(),
            income_band: "15001-30000".into(),
            address_change_last_6_months: "No".into(),
            policy_type: "Vehicle".into(),
            deductible_level: "Medium".into(),
            days_policy_accident: 150.0,
            days_policy_claim: 200.0,
            vehicle_category: "SUV".into(),
            vehicle_price_range: "100k-250k".into(),
            vehicle_age_years: 5.0,
            past_number_of_claims: 1.0,
            accident_area: "Urban".into(),
            police_report_filed: "Yes".into(),
            witness_present: "Yes".into(),
            agent_type: "Internal".into(),
            claim_amendments: 0.0,
            address_change_linked_to_claim: "No".into(),
            fraud_percentage_estimate: 15.5,
            fraud_type: "None".into(),
            high_risk_combination: "No".into(),
            region: "Khomas".into(),
            employment_status: "Employed".into(),
            claim_amount_range: "10k-50k".into(),
            payout_to_claim_ratio: 0.75,
            claim_channel: "Agent".into(),
            weather_condition: "Clear".into(),
            accident_time: "Morning".into(),
            repair_shop_pattern: "One-time".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_value_covers_schema() {
        let claim = ClaimRecord::sample();
        for column in RAW_COLUMNS {
            let value = claim.column_value(column.name);
            assert!(value.is_some(), "no value for {}", column.name);
            assert_eq!(value.map(|v| v.kind()), Some(column.kind), "{}", column.name);
        }
        assert!(claim.column_value("FirstName").is_none());
    }

    #[test]
    fn test_fields_roundtrip() {
        let claim = ClaimRecord::sample();
        let rebuilt = ClaimRecord::from_fields(&claim.to_fields()).unwrap();
        assert_eq!(rebuilt, claim);
    }

    #[test]
    fn test_missing_fraud_type_becomes_unknown() {
        let mut fields = ClaimRecord::sample().to_fields();
        fields.remove("FraudType");
        let claim = ClaimRecord::from_fields(&fields).unwrap();
        assert_eq!(claim.fraud_type, UNKNOWN_FRAUD_TYPE);

        fields.insert("FraudType".into(), "  ".into());
        let claim = ClaimRecord::from_fields(&fields).unwrap();
        assert_eq!(claim.fraud_type, UNKNOWN_FRAUD_TYPE);
    }

    #[test]
    fn test_missing_column_rejected() {
        let mut fields = ClaimRecord::sample().to_fields();
        fields.remove("Region");
        assert_eq!(
            ClaimRecord::from_fields(&fields),
            Err(FieldError::Missing("Region".into()))
        );
    }

    #[test]
    fn test_invalid_number_rejected() {
        let mut fields = ClaimRecord::sample().to_fields();
        fields.insert("PastNumberOfClaims".into(), "many".into());
        assert!(matches!(
            ClaimRecord::from_fields(&fields),
            Err(FieldError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_negative_days_rejected() {
        let mut fields = ClaimRecord::sample().to_fields();
        fields.insert("Days_Policy_Accident".into(), "-1".into());
        assert_eq!(
            ClaimRecord::from_fields(&fields),
            Err(FieldError::Negative { column: "Days_Policy_Accident".into(), value: -1.0 })
        );

        fields.insert("Days_Policy_Accident".into(), "0".into());
        assert!(ClaimRecord::from_fields(&fields).is_ok());
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_value(ClaimRecord::sample()).unwrap();
        assert_eq!(json["VehicleAge(In Years)"], 5.0);
        assert_eq!(json["AddressChange_Last6Months"], "No");
    }
}
