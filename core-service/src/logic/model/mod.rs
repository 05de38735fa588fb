//! Model Module - Gradient Boosted Fraud Classifier
//!
//! - `tree` / `gbdt`: the boosted ensemble
//! - `training`: labeled claims to a `TrainedArtifact`
//! - `inference`: single-claim scoring with layout check
//! - `risk` / `metrics`: thresholds and evaluation

pub mod gbdt;
pub mod inference;
pub mod metrics;
pub mod risk;
pub mod training;
pub mod tree;

#[cfg(test)]
mod tests;

pub use gbdt::{BoostingParams, GradientBoostedClassifier};
pub use inference::{inference_stats, predict, InferenceOutcome, InferenceStats};
pub use metrics::TrainingMetrics;
pub use risk::RiskLevel;
pub use training::{train_artifact, train_artifact_with, TrainingError};
