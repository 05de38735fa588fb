use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::artifact::{ArtifactError, ArtifactSummary};
use crate::logic::config::ScoringMode;
use crate::logic::dataset::DatasetError;
use crate::logic::features::LayoutInfo;
use crate::logic::model::TrainingError;
use crate::logic::prediction::PredictionResult;

/// Lifecycle of the engine's current artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactState {
    Unloaded,
    Missing,
    Ready,
    Retraining,
    Failed,
}

impl ArtifactState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactState::Unloaded => "unloaded",
            ArtifactState::Missing => "missing",
            ArtifactState::Ready => "ready",
            ArtifactState::Retraining => "retraining",
            ArtifactState::Failed => "failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum ScoringError {
    /// No artifact was ever loaded or trained
    #[error("model not trained")]
    ModelNotTrained,

    /// Drift recovery failed; the claim was not scored
    #[error("model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("training error: {0}")]
    Training(#[from] TrainingError),
}

/// Per-claim outcome of a batch call
#[derive(Debug, Clone, Serialize)]
pub struct BatchPrediction {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PredictionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchPrediction {
    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }
}

/// Snapshot for health and status endpoints
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub state: ArtifactState,
    pub mode: ScoringMode,
    pub artifact: Option<ArtifactSummary>,
    /// Layout the live feature engineer produces
    pub layout: LayoutInfo,
    pub artifact_location: String,
    pub training_source: String,
    pub predictions_served: u64,
    pub retrain_count: u64,
    pub unseen_categories: u64,
    pub inference_count: u64,
    pub avg_inference_us: f64,
    pub last_error: Option<String>,
}
