//! Training - labeled claims to a complete `TrainedArtifact`

use std::time::Instant;

use chrono::Utc;
use thiserror::Error;

use super::gbdt::{BoostingParams, GradientBoostedClassifier};
use super::metrics::TrainingMetrics;
use crate::logic::artifact::TrainedArtifact;
use crate::logic::dataset::LabeledClaim;
use crate::logic::encoding::{EncodingError, FittedEncoders};
use crate::logic::features::{engineer, EngineeredFeatures, LayoutInfo};

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("no training rows")]
    EmptyDataset,

    #[error("feature matrix has {rows} rows but {labels} labels")]
    ShapeMismatch { rows: usize, labels: usize },

    #[error("training labels contain a single class")]
    SingleClass,

    #[error("encoder fitting failed: {0}")]
    Encoding(#[from] EncodingError),
}

/// Train with the fixed production hyperparameters
pub fn train_artifact(rows: &[LabeledClaim]) -> Result<TrainedArtifact, TrainingError> {
    train_artifact_with(rows, BoostingParams::default())
}

/// Engineer, encode and fit; metrics are measured on the training rows
pub fn train_artifact_with(
    rows: &[LabeledClaim],
    params: BoostingParams,
) -> Result<TrainedArtifact, TrainingError> {
    if rows.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }

    let started = Instant::now();
    log::info!(
        "Training started: {} rows, {} trees, depth {}",
        rows.len(),
        params.n_estimators,
        params.max_depth
    );

    let features: Vec<EngineeredFeatures> = rows.iter().map(|r| engineer(&r.claim)).collect();
    let labels: Vec<u8> = rows.iter().map(|r| u8::from(r.is_fraud())).collect();

    let encoders = FittedEncoders::fit(&features)?;
    let x = encoders.transform_matrix(&features);

    let classifier = GradientBoostedClassifier::fit(params, x.view(), &labels)?;
    let probabilities = classifier.predict_batch(x.view());
    let metrics = TrainingMetrics::compute(&labels, &probabilities);

    let layout = LayoutInfo::current();
    let artifact = TrainedArtifact {
        id: uuid::Uuid::new_v4().to_string(),
        created_at: Utc::now(),
        feature_version: layout.version,
        layout_hash: layout.hash,
        feature_names: layout.feature_names,
        encoders,
        classifier,
        metrics,
    };

    log::info!(
        "Training finished in {:.1}s: artifact {}, {} trees, accuracy {:.3}, roc_auc {}",
        started.elapsed().as_secs_f64(),
        artifact.id,
        artifact.classifier.n_trees(),
        metrics.accuracy,
        metrics.roc_auc.map_or_else(|| "n/a".to_string(), |v| format!("{:.3}", v))
    );

    Ok(artifact)
}
