use super::*;
use crate::logic::artifact::{FileArtifactStore, TrainedArtifact};
use crate::logic::dataset::{DatasetError, InMemoryDataset, LabeledClaim};
use crate::logic::model::{train_artifact_with, RiskLevel};
use crate::logic::prediction::ScoringMethod;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize};
use tempfile::tempdir;

fn quick_params() -> BoostingParams {
    BoostingParams { n_estimators: 10, ..BoostingParams::default() }
}

/// In-memory rows that count how often they are read
struct CountingSource {
    inner: InMemoryDataset,
    loads: AtomicUsize,
}

impl CountingSource {
    fn synthetic() -> Self {
        Self { inner: InMemoryDataset::synthetic(200, 3), loads: AtomicUsize::new(0) }
    }

    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl TrainingSource for CountingSource {
    fn load(&self) -> Result<Vec<LabeledClaim>, DatasetError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load()
    }

    fn describe(&self) -> String {
        "counting".into()
    }
}

struct UnavailableSource;

impl TrainingSource for UnavailableSource {
    fn load(&self) -> Result<Vec<LabeledClaim>, DatasetError> {
        Err(DatasetError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "dataset gone")))
    }

    fn describe(&self) -> String {
        "unavailable".into()
    }
}

/// Synthetic rows that can be switched off after the first training run
struct SwitchableSource {
    inner: InMemoryDataset,
    available: AtomicBool,
}

impl SwitchableSource {
    fn synthetic() -> Self {
        Self { inner: InMemoryDataset::synthetic(200, 3), available: AtomicBool::new(true) }
    }

    fn go_offline(&self) {
        self.available.store(false, Ordering::SeqCst);
    }
}

impl TrainingSource for SwitchableSource {
    fn load(&self) -> Result<Vec<LabeledClaim>, DatasetError> {
        if !self.available.load(Ordering::SeqCst) {
            return UnavailableSource.load();
        }
        self.inner.load()
    }

    fn describe(&self) -> String {
        "switchable".into()
    }
}

fn engine_with(
    path: &Path,
    mode: ScoringMode,
    source: Arc<dyn TrainingSource>,
) -> FraudEngine {
    let config = EngineConfig {
        artifact_path: path.to_path_buf(),
        dataset_path: path.with_extension("csv"),
        mode,
    };
    let store = Arc::new(FileArtifactStore::new(path));
    FraudEngine::new(config, source, store).with_params(quick_params())
}

/// Artifact trained before `WeatherRisk` was dropped from its feature list
fn stale_artifact() -> TrainedArtifact {
    let mut artifact = train_artifact_with(&InMemoryDataset::synthetic(120, 9).load().unwrap(), quick_params()).unwrap();
    artifact.feature_names.retain(|n| n != "WeatherRisk");
    artifact
}

fn example_high_risk_claim() -> ClaimRecord {
    ClaimRecord {
        age_group: "18-25".into(),
        income_band: "5000-15000".into(),
        past_number_of_claims: 3.0,
        claim_amendments: 4.0,
        address_change_last_6_months: "Yes".into(),
        address_change_linked_to_claim: "Yes".into(),
        fraud_percentage_estimate: 75.0,
        high_risk_combination: "Yes".into(),
        vehicle_age_years: 16.0,
        ..ClaimRecord::sample()
    }
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_initialize_trains_and_persists_when_missing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    let source = Arc::new(CountingSource::synthetic());
    let engine = engine_with(&path, ScoringMode::Model, source.clone());

    assert_eq!(engine.state(), ArtifactState::Unloaded);
    let artifact = engine.initialize().unwrap();

    assert_eq!(engine.state(), ArtifactState::Ready);
    assert_eq!(source.loads(), 1);
    assert!(path.exists());
    assert_eq!(engine.current_artifact().map(|a| a.id.clone()), Some(artifact.id.clone()));
    assert_eq!(engine.status().retrain_count, 1);
}

#[test]
fn test_initialize_loads_existing_artifact_without_training() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    engine_with(&path, ScoringMode::Model, Arc::new(CountingSource::synthetic()))
        .initialize()
        .unwrap();

    let source = Arc::new(CountingSource::synthetic());
    let engine = engine_with(&path, ScoringMode::Model, source.clone());
    engine.initialize().unwrap();

    assert_eq!(source.loads(), 0);
    assert_eq!(engine.state(), ArtifactState::Ready);
    assert_eq!(engine.status().retrain_count, 0);
}

#[test]
fn test_corrupt_artifact_triggers_training() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, b"{\"format_version\": 1, \"checksum\": \"x\"").unwrap();

    let source = Arc::new(CountingSource::synthetic());
    let engine = engine_with(&path, ScoringMode::Model, source.clone());
    engine.initialize().unwrap();

    assert_eq!(source.loads(), 1);
    assert!(engine.predict(&ClaimRecord::sample()).is_ok());
}

#[test]
fn test_training_failure_leaves_engine_failed() {
    let dir = tempdir().unwrap();
    let engine = engine_with(&dir.path().join("model.json"), ScoringMode::Model, Arc::new(UnavailableSource));

    assert!(matches!(engine.initialize(), Err(ScoringError::Dataset(_))));
    assert_eq!(engine.state(), ArtifactState::Failed);
    assert!(engine.status().last_error.is_some());
    assert!(matches!(engine.predict(&ClaimRecord::sample()), Err(ScoringError::ModelNotTrained)));

    // the rule path never depends on an artifact
    assert_eq!(engine.score_heuristic(&ClaimRecord::sample()).method, ScoringMethod::Heuristic);
}

#[test]
fn test_single_class_dataset_is_rejected() {
    let dir = tempdir().unwrap();
    let rows: Vec<_> = (0..30).map(|_| LabeledClaim::new(ClaimRecord::sample(), false)).collect();
    let engine = engine_with(
        &dir.path().join("model.json"),
        ScoringMode::Model,
        Arc::new(InMemoryDataset::new(rows)),
    );

    assert!(matches!(
        engine.initialize(),
        Err(ScoringError::Dataset(DatasetError::SingleClass))
    ));
}

// ============================================================================
// DRIFT RECOVERY
// ============================================================================

#[test]
fn test_schema_drift_retrains_and_retries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    let stale = stale_artifact();
    FileArtifactStore::new(&path).save(&stale).unwrap();

    let source = Arc::new(CountingSource::synthetic());
    let engine = engine_with(&path, ScoringMode::Model, source.clone());
    engine.initialize().unwrap();
    assert_eq!(source.loads(), 0);

    let result = engine.predict(&ClaimRecord::sample()).unwrap();
    assert_eq!(result.method, ScoringMethod::GradientBoosting);

    let fresh = engine.current_artifact().unwrap();
    assert_ne!(fresh.id, stale.id);
    assert!(fresh.check_layout().is_ok());
    assert_eq!(engine.state(), ArtifactState::Ready);
    assert_eq!(source.loads(), 1);

    // replacement was persisted
    let persisted = FileArtifactStore::new(&path).load().unwrap().unwrap();
    assert_eq!(persisted.id, fresh.id);
}

#[test]
fn test_drift_with_failed_retrain_is_unavailable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    FileArtifactStore::new(&path).save(&stale_artifact()).unwrap();

    let engine = engine_with(&path, ScoringMode::Model, Arc::new(UnavailableSource));
    engine.initialize().unwrap();

    assert!(matches!(
        engine.predict(&ClaimRecord::sample()),
        Err(ScoringError::ModelUnavailable { .. })
    ));
    assert_eq!(engine.state(), ArtifactState::Failed);
}

#[test]
fn test_concurrent_drift_retrains_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    FileArtifactStore::new(&path).save(&stale_artifact()).unwrap();

    let source = Arc::new(CountingSource::synthetic());
    let engine = engine_with(&path, ScoringMode::Model, source.clone());
    engine.initialize().unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                assert!(engine.predict(&ClaimRecord::sample()).is_ok());
            });
        }
    });

    assert_eq!(source.loads(), 1);
    assert_eq!(engine.status().retrain_count, 1);

    // four requests saw the swap, the new artifact is reported once
    let trained = engine.take_trained();
    assert_eq!(trained.len(), 1);
    assert_eq!(trained[0].id, engine.current_artifact().unwrap().id);
    assert!(engine.take_trained().is_empty());
}

#[test]
fn test_manual_retrain_swaps_artifact() {
    let dir = tempdir().unwrap();
    let engine = engine_with(
        &dir.path().join("model.json"),
        ScoringMode::Model,
        Arc::new(CountingSource::synthetic()),
    );
    let first = engine.initialize().unwrap();
    let second = engine.retrain().unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(engine.current_artifact().unwrap().id, second.id);
    assert_eq!(engine.status().retrain_count, 2);

    let ids: Vec<_> = engine.take_trained().iter().map(|a| a.id.clone()).collect();
    assert_eq!(ids, vec![first.id.clone(), second.id.clone()]);
}

#[test]
fn test_loaded_artifact_is_not_reported_as_trained() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    engine_with(&path, ScoringMode::Model, Arc::new(CountingSource::synthetic()))
        .initialize()
        .unwrap();

    let engine = engine_with(&path, ScoringMode::Model, Arc::new(CountingSource::synthetic()));
    engine.initialize().unwrap();
    assert!(engine.take_trained().is_empty());
}

#[test]
fn test_failed_manual_retrain_keeps_serving() {
    let dir = tempdir().unwrap();
    let source = Arc::new(SwitchableSource::synthetic());
    let engine = engine_with(&dir.path().join("model.json"), ScoringMode::Model, source.clone());
    let first = engine.initialize().unwrap();

    source.go_offline();
    assert!(matches!(engine.retrain(), Err(ScoringError::Dataset(_))));

    assert_eq!(engine.state(), ArtifactState::Ready);
    assert_eq!(engine.current_artifact().unwrap().id, first.id);
    assert!(engine.status().last_error.is_some());
    assert!(engine.predict(&ClaimRecord::sample()).is_ok());
}

// ============================================================================
// SCORING
// ============================================================================

#[test]
fn test_heuristic_mode_scores_without_artifact() {
    let dir = tempdir().unwrap();
    let engine = engine_with(&dir.path().join("model.json"), ScoringMode::Heuristic, Arc::new(UnavailableSource));

    let high = engine.score(&example_high_risk_claim()).unwrap();
    assert_eq!(high.raw_score, Some(14));
    assert_eq!(high.probability, 0.95);
    assert_eq!(high.risk_level, RiskLevel::High);
    assert!(high.prediction);

    let clean = ClaimRecord { past_number_of_claims: 0.0, ..ClaimRecord::sample() };
    let low = engine.score(&clean).unwrap();
    assert_eq!(low.raw_score, Some(0));
    assert_eq!(low.risk_level, RiskLevel::Low);
    assert!(!low.prediction);
}

#[test]
fn test_model_mode_dispatches_to_classifier() {
    let dir = tempdir().unwrap();
    let engine = engine_with(
        &dir.path().join("model.json"),
        ScoringMode::Model,
        Arc::new(CountingSource::synthetic()),
    );
    engine.initialize().unwrap();

    let result = engine.score(&ClaimRecord::sample()).unwrap();
    assert_eq!(result.method, ScoringMethod::GradientBoosting);
    assert!(result.raw_score.is_none());
}

#[test]
fn test_batch_reports_each_claim() {
    let dir = tempdir().unwrap();
    let engine = engine_with(&dir.path().join("model.json"), ScoringMode::Model, Arc::new(UnavailableSource));
    let claims = vec![ClaimRecord::sample(), example_high_risk_claim()];

    // no artifact: every entry fails independently
    let failed = engine.predict_batch(&claims);
    assert_eq!(failed.len(), 2);
    assert!(failed.iter().all(|b| !b.is_ok() && b.error.is_some()));
    assert_eq!(failed[1].index, 1);

    let heuristic = engine_with(&dir.path().join("other.json"), ScoringMode::Heuristic, Arc::new(UnavailableSource));
    let scored = heuristic.predict_batch(&claims);
    assert!(scored.iter().all(BatchPrediction::is_ok));
    assert_eq!(scored[1].result.as_ref().and_then(|r| r.raw_score), Some(14));
}

#[test]
fn test_status_reports_layout_and_counters() {
    let dir = tempdir().unwrap();
    let engine = engine_with(
        &dir.path().join("model.json"),
        ScoringMode::Model,
        Arc::new(CountingSource::synthetic()),
    );
    engine.initialize().unwrap();
    engine.predict(&ClaimRecord::sample()).unwrap();
    engine.score_heuristic(&ClaimRecord::sample());

    let status = engine.status();
    assert_eq!(status.state, ArtifactState::Ready);
    assert_eq!(status.mode, ScoringMode::Model);
    assert_eq!(status.predictions_served, 2);
    assert_eq!(status.layout, LayoutInfo::current());
    assert_eq!(status.training_source, "counting");
    assert!(status.artifact.is_some());
    assert!(status.last_error.is_none());
}
