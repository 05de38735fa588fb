//! Engine Module - Prediction Orchestrator
//!
//! Owns the current artifact and dispatches claims to the classifier or the
//! heuristic scorer.
//!
//! # Artifact lifecycle
//! `Unloaded → Ready` (load ok) or `Unloaded → Missing → Ready` (trained).
//! On schema drift: `Ready → Retraining → Ready | Failed`, then the
//! prediction is retried exactly once.
//!
//! # Concurrency
//! The live artifact is an `Arc` behind a `RwLock`; readers clone the `Arc`
//! and never see a half-built artifact. Retraining holds a separate mutex,
//! builds and persists a new artifact, and only then swaps the reference.

pub mod types;
#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::logic::artifact::{ArtifactStore, FileArtifactStore, TrainedArtifact};
use crate::logic::claim::ClaimRecord;
use crate::logic::config::{EngineConfig, ScoringMode};
use crate::logic::dataset::{check_trainable, CsvDataset, TrainingSource};
use crate::logic::encoding::unseen_category_count;
use crate::logic::features::LayoutInfo;
use crate::logic::heuristic;
use crate::logic::model::{self, inference_stats, BoostingParams, InferenceOutcome};
use crate::logic::prediction::PredictionResult;

pub use types::{ArtifactState, BatchPrediction, EngineStatus, ScoringError};

pub struct FraudEngine {
    config: EngineConfig,
    source: Arc<dyn TrainingSource>,
    store: Arc<dyn ArtifactStore>,
    params: BoostingParams,
    current: RwLock<Option<Arc<TrainedArtifact>>>,
    state: RwLock<ArtifactState>,
    training: Mutex<()>,
    last_error: RwLock<Option<String>>,
    /// Freshly trained artifacts not yet handed to `take_trained`
    trained: Mutex<Vec<Arc<TrainedArtifact>>>,
    predictions_served: AtomicU64,
    retrain_count: AtomicU64,
}

impl FraudEngine {
    pub fn new(
        config: EngineConfig,
        source: Arc<dyn TrainingSource>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            config,
            source,
            store,
            params: BoostingParams::default(),
            current: RwLock::new(None),
            state: RwLock::new(ArtifactState::Unloaded),
            training: Mutex::new(()),
            last_error: RwLock::new(None),
            trained: Mutex::new(Vec::new()),
            predictions_served: AtomicU64::new(0),
            retrain_count: AtomicU64::new(0),
        }
    }

    /// CSV dataset and file artifact store at the configured paths
    pub fn from_config(config: EngineConfig) -> Self {
        let source = Arc::new(CsvDataset::new(config.dataset_path.clone()));
        let store = Arc::new(FileArtifactStore::new(config.artifact_path.clone()));
        Self::new(config, source, store)
    }

    /// Override boosting hyperparameters for subsequent training runs
    pub fn with_params(mut self, params: BoostingParams) -> Self {
        self.params = params;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Load the persisted artifact, or train and persist a fresh one
    pub fn initialize(&self) -> Result<Arc<TrainedArtifact>, ScoringError> {
        let _guard = self.training.lock();

        if let Some(current) = self.current_artifact() {
            return Ok(current);
        }

        match self.store.load() {
            Ok(Some(artifact)) => {
                log::info!(
                    "Loaded artifact {} from {} (v{}, hash {:08x}, {} trees)",
                    artifact.id,
                    self.store.location(),
                    artifact.feature_version,
                    artifact.layout_hash,
                    artifact.classifier.n_trees()
                );
                let artifact = Arc::new(artifact);
                self.install(artifact.clone());
                return Ok(artifact);
            }
            Ok(None) => {
                log::warn!("No artifact at {}, training from {}", self.store.location(), self.source.describe());
            }
            Err(e) => {
                log::warn!(
                    "Artifact at {} is unreadable ({}), training from {}",
                    self.store.location(),
                    e,
                    self.source.describe()
                );
            }
        }

        self.set_state(ArtifactState::Missing);
        self.train_and_install()
    }

    /// Build a brand-new artifact, persist it, then swap it in
    pub fn retrain(&self) -> Result<Arc<TrainedArtifact>, ScoringError> {
        let _guard = self.training.lock();
        self.train_and_install()
    }

    /// Retrain unless another caller already replaced `stale_id`
    fn retrain_replacing(&self, stale_id: &str) -> Result<Arc<TrainedArtifact>, ScoringError> {
        let _guard = self.training.lock();

        if let Some(current) = self.current_artifact() {
            if current.id != stale_id {
                log::info!("Artifact {} already replaced by {}", stale_id, current.id);
                return Ok(current);
            }
        }

        self.train_and_install()
    }

    /// Caller must hold `self.training`
    fn train_and_install(&self) -> Result<Arc<TrainedArtifact>, ScoringError> {
        let previous = self.current_artifact();
        if previous.is_some() {
            self.set_state(ArtifactState::Retraining);
        }

        match self.train_and_persist() {
            Ok(artifact) => {
                let artifact = Arc::new(artifact);
                self.install(artifact.clone());
                self.trained.lock().push(artifact.clone());
                self.retrain_count.fetch_add(1, Ordering::Relaxed);
                Ok(artifact)
            }
            Err(e) => {
                // a previous artifact that still matches the layout keeps serving
                let serving = previous.is_some_and(|a| a.check_layout().is_ok());
                if serving {
                    log::error!("Training failed, keeping the current artifact: {}", e);
                    self.set_state(ArtifactState::Ready);
                } else {
                    log::error!("Training failed: {}", e);
                    self.set_state(ArtifactState::Failed);
                }
                *self.last_error.write() = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn train_and_persist(&self) -> Result<TrainedArtifact, ScoringError> {
        let rows = self.source.load()?;
        check_trainable(&rows)?;

        let artifact = model::train_artifact_with(&rows, self.params)?;
        self.store.save(&artifact)?;
        Ok(artifact)
    }

    fn install(&self, artifact: Arc<TrainedArtifact>) {
        *self.current.write() = Some(artifact);
        self.set_state(ArtifactState::Ready);
        *self.last_error.write() = None;
    }

    fn set_state(&self, state: ArtifactState) {
        *self.state.write() = state;
    }

    // ========================================================================
    // SCORING
    // ========================================================================

    /// Score with the configured scorer
    pub fn score(&self, claim: &ClaimRecord) -> Result<PredictionResult, ScoringError> {
        match self.config.mode {
            ScoringMode::Heuristic => Ok(self.score_heuristic(claim)),
            ScoringMode::Model => self.predict(claim),
        }
    }

    /// Rule-based scorer; never needs an artifact
    pub fn score_heuristic(&self, claim: &ClaimRecord) -> PredictionResult {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);
        heuristic::score(claim)
    }

    /// Classifier path. On schema drift: retrain, swap, retry once.
    pub fn predict(&self, claim: &ClaimRecord) -> Result<PredictionResult, ScoringError> {
        let artifact = self.current_artifact().ok_or(ScoringError::ModelNotTrained)?;

        let mismatch = match model::predict(&artifact, claim) {
            InferenceOutcome::Scored(result) => {
                self.predictions_served.fetch_add(1, Ordering::Relaxed);
                return Ok(result);
            }
            InferenceOutcome::SchemaMismatch(mismatch) => mismatch,
        };

        log::warn!(
            "Schema drift on artifact {}: {} feature(s) expected (hash {:08x}), {} produced (hash {:08x}); retraining",
            artifact.id,
            mismatch.expected_count,
            mismatch.expected_hash,
            mismatch.actual_count,
            mismatch.actual_hash
        );

        let fresh = self
            .retrain_replacing(&artifact.id)
            .map_err(|e| ScoringError::ModelUnavailable { reason: e.to_string() })?;

        match model::predict(&fresh, claim) {
            InferenceOutcome::Scored(result) => {
                log::info!("Retry on artifact {} succeeded", fresh.id);
                self.predictions_served.fetch_add(1, Ordering::Relaxed);
                Ok(result)
            }
            InferenceOutcome::SchemaMismatch(mismatch) => {
                log::error!("Artifact {} still mismatched after retrain: {}", fresh.id, mismatch);
                Err(ScoringError::ModelUnavailable { reason: mismatch.to_string() })
            }
        }
    }

    /// Score many claims; one failure never aborts the rest
    pub fn predict_batch(&self, claims: &[ClaimRecord]) -> Vec<BatchPrediction> {
        claims
            .iter()
            .enumerate()
            .map(|(index, claim)| match self.score(claim) {
                Ok(result) => BatchPrediction { index, result: Some(result), error: None },
                Err(e) => BatchPrediction { index, result: None, error: Some(e.to_string()) },
            })
            .collect()
    }

    // ========================================================================
    // STATUS
    // ========================================================================

    pub fn state(&self) -> ArtifactState {
        *self.state.read()
    }

    pub fn current_artifact(&self) -> Option<Arc<TrainedArtifact>> {
        self.current.read().clone()
    }

    /// Artifacts trained since the previous call. Each one is returned to
    /// exactly one caller, however many requests observed the swap.
    pub fn take_trained(&self) -> Vec<Arc<TrainedArtifact>> {
        std::mem::take(&mut *self.trained.lock())
    }

    pub fn status(&self) -> EngineStatus {
        let inference = inference_stats();
        EngineStatus {
            state: self.state(),
            mode: self.config.mode,
            artifact: self.current_artifact().map(|a| a.summary()),
            layout: LayoutInfo::current(),
            artifact_location: self.store.location(),
            training_source: self.source.describe(),
            predictions_served: self.predictions_served.load(Ordering::Relaxed),
            retrain_count: self.retrain_count.load(Ordering::Relaxed),
            unseen_categories: unseen_category_count(),
            inference_count: inference.inference_count,
            avg_inference_us: inference.avg_latency_us,
            last_error: self.last_error.read().clone(),
        }
    }
}
