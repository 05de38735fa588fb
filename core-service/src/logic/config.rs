//! Engine configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Which scorer answers `FraudEngine::score`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Deterministic rule engine (deployed primary path)
    Heuristic,
    /// Trained gradient-boosted classifier with drift recovery
    Model,
}

impl ScoringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMode::Heuristic => "heuristic",
            ScoringMode::Model => "model",
        }
    }

    /// Parse from a config string; unknown values fall back to heuristic
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "model" | "gbdt" | "gradient_boosting" => ScoringMode::Model,
            _ => ScoringMode::Heuristic,
        }
    }
}

impl Default for ScoringMode {
    fn default() -> Self {
        ScoringMode::Heuristic
    }
}

impl std::fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Where the trained artifact is persisted
    pub artifact_path: PathBuf,

    /// Canonical training dataset (CSV)
    pub dataset_path: PathBuf,

    /// Scorer used by `FraudEngine::score`
    pub mode: ScoringMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            artifact_path: constants::default_artifact_path(),
            dataset_path: PathBuf::from(constants::DEFAULT_DATASET_PATH),
            mode: ScoringMode::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            artifact_path: constants::get_artifact_path(),
            dataset_path: constants::get_dataset_path(),
            mode: std::env::var("SCORING_MODE")
                .map(|m| ScoringMode::parse(&m))
                .unwrap_or_default(),
        }
    }
}
