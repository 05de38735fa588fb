//! Prediction Result - what either scorer hands to the result sink

use serde::{Deserialize, Serialize};

use crate::logic::model::RiskLevel;

/// Which scorer produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    GradientBoosting,
    Heuristic,
}

impl ScoringMethod {
    /// Name recorded alongside persisted predictions
    pub fn model_name(&self) -> &'static str {
        match self {
            ScoringMethod::GradientBoosting => "Gradient Boosting",
            ScoringMethod::Heuristic => "Heuristic Rules",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Hard fraud label
    pub prediction: bool,
    /// Fraud probability in [0, 1]
    pub probability: f64,
    pub risk_level: RiskLevel,
    /// Triggered rules, in evaluation order (heuristic path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_factors: Option<Vec<String>>,
    /// Sum of rule points (heuristic path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_score: Option<u32>,
    pub method: ScoringMethod,
}

impl PredictionResult {
    pub fn model_name(&self) -> &'static str {
        self.method.model_name()
    }
}
