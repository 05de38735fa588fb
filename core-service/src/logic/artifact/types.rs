use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::encoding::FittedEncoders;
use crate::logic::features::{validate_feature_names, LayoutInfo, LayoutMismatch};
use crate::logic::model::{GradientBoostedClassifier, TrainingMetrics};

/// Everything inference needs, produced by one training run.
///
/// Never patched after creation; a retrain builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedArtifact {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub feature_version: u8,
    pub layout_hash: u32,
    /// The only valid column order for inference
    pub feature_names: Vec<String>,
    pub encoders: FittedEncoders,
    pub classifier: GradientBoostedClassifier,
    pub metrics: TrainingMetrics,
}

impl TrainedArtifact {
    /// Compare the stored feature ordering with the live feature engineer
    pub fn check_layout(&self) -> Result<(), LayoutMismatch> {
        validate_feature_names(&self.feature_names, self.feature_version, self.layout_hash)
    }

    pub fn layout(&self) -> LayoutInfo {
        LayoutInfo {
            version: self.feature_version,
            hash: self.layout_hash,
            feature_count: self.feature_names.len(),
            feature_names: self.feature_names.clone(),
        }
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            id: self.id.clone(),
            created_at: self.created_at,
            feature_version: self.feature_version,
            layout_hash: format!("{:08x}", self.layout_hash),
            feature_count: self.feature_names.len(),
            n_trees: self.classifier.n_trees(),
            metrics: self.metrics,
        }
    }
}

/// Lightweight view for status reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub feature_version: u8,
    pub layout_hash: String,
    pub feature_count: usize,
    pub n_trees: usize,
    pub metrics: TrainingMetrics,
}

/// On-disk wrapper around a serialized artifact
#[derive(Debug, Serialize, Deserialize)]
pub struct ArtifactEnvelope {
    pub format_version: u32,
    /// SHA-256 hex of the canonical JSON of `artifact`
    pub checksum: String,
    pub artifact: serde_json::Value,
}
