//! Risk levels and probability thresholds

use serde::{Deserialize, Serialize};

use crate::constants::{DECISION_THRESHOLD, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};

/// Risk bucket of a scored claim.
///
/// Serialized as the analyst-facing label ("HIGH RISK", ...) that the claim
/// store filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "LOW RISK", alias = "LOW")]
    Low,
    #[serde(rename = "MEDIUM RISK", alias = "MEDIUM")]
    Medium,
    #[serde(rename = "HIGH RISK", alias = "HIGH")]
    High,
}

impl RiskLevel {
    /// HIGH at >= 0.7, MEDIUM at >= 0.4, else LOW
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if probability >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW RISK",
            RiskLevel::Medium => "MEDIUM RISK",
            RiskLevel::High => "HIGH RISK",
        }
    }

    /// Accepts "HIGH", "high", "HIGH RISK", ...
    pub fn parse(value: &str) -> Option<Self> {
        let upper = value.trim().to_ascii_uppercase();
        match upper.strip_suffix(" RISK").unwrap_or(&upper) {
            "LOW" => Some(RiskLevel::Low),
            "MEDIUM" => Some(RiskLevel::Medium),
            "HIGH" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Hard label: fraud when probability >= 0.5
pub fn decide(probability: f64) -> bool {
    probability >= DECISION_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_inclusive() {
        assert_eq!(RiskLevel::from_probability(0.7), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.6999), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.4), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.3999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(1.0), RiskLevel::High);
    }

    #[test]
    fn test_decision_threshold() {
        assert!(decide(0.5));
        assert!(!decide(0.4999));
    }

    #[test]
    fn test_parse_and_serde() {
        assert_eq!(RiskLevel::parse("high"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse("MEDIUM RISK"), Some(RiskLevel::Medium));
        assert_eq!(RiskLevel::parse("extreme"), None);

        let json = serde_json::to_string(&RiskLevel::High).unwrap();
        assert_eq!(json, "\"HIGH RISK\"");
        let level: RiskLevel = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(level, RiskLevel::Low);
    }
}
