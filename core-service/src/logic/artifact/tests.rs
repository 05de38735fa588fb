use super::*;
use crate::logic::claim::ClaimRecord;
use crate::logic::dataset::synthetic;
use crate::logic::model::{predict, train_artifact_with, BoostingParams, InferenceOutcome};
use std::fs;
use tempfile::tempdir;

fn artifact() -> TrainedArtifact {
    let params = BoostingParams { n_estimators: 15, ..BoostingParams::default() };
    train_artifact_with(&synthetic::generate(150, 5), params).unwrap()
}

fn probability(artifact: &TrainedArtifact, claim: &ClaimRecord) -> f64 {
    match predict(artifact, claim) {
        InferenceOutcome::Scored(r) => r.probability,
        InferenceOutcome::SchemaMismatch(m) => panic!("unexpected drift: {m}"),
    }
}

#[test]
fn test_save_then_load_gives_identical_predictions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("models").join("model.json");
    let original = artifact();

    storage::save(&path, &original).unwrap();
    let restored = storage::load(&path).unwrap().unwrap();

    assert_eq!(restored, original);
    for row in synthetic::generate(20, 77) {
        assert_eq!(probability(&restored, &row.claim), probability(&original, &row.claim));
    }
}

#[test]
fn test_degenerate_ratio_still_persists() {
    // days_policy_accident = -1 makes ClaimToPolicyRatio divide by zero
    let mut rows = synthetic::generate(150, 5);
    rows[0].claim.days_policy_accident = -1.0;
    let params = BoostingParams { n_estimators: 10, ..BoostingParams::default() };
    let trained = train_artifact_with(&rows, params).unwrap();

    let stats = trained.encoders.scaler("ClaimToPolicyRatio").unwrap();
    assert!(stats.mean.is_finite());
    assert!(stats.std.is_finite());

    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    storage::save(&path, &trained).unwrap();
    let restored = storage::load(&path).unwrap().unwrap();
    assert_eq!(restored, trained);
    assert!(probability(&restored, &rows[0].claim).is_finite());
}

#[test]
fn test_load_missing_is_none() {
    let dir = tempdir().unwrap();
    assert!(storage::load(&dir.path().join("absent.json")).unwrap().is_none());
}

#[test]
fn test_load_garbage_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    fs::write(&path, b"not json at all").unwrap();
    assert!(matches!(storage::load(&path), Err(ArtifactError::Serialization(_))));
}

#[test]
fn test_tampered_artifact_fails_checksum() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    storage::save(&path, &artifact()).unwrap();

    let mut envelope: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    envelope["artifact"]["id"] = serde_json::json!("someone-else");
    fs::write(&path, serde_json::to_vec(&envelope).unwrap()).unwrap();

    assert!(matches!(storage::load(&path), Err(ArtifactError::Checksum { .. })));
}

#[test]
fn test_unknown_format_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    storage::save(&path, &artifact()).unwrap();

    let mut envelope: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    envelope["format_version"] = serde_json::json!(ARTIFACT_FORMAT_VERSION + 1);
    fs::write(&path, serde_json::to_vec(&envelope).unwrap()).unwrap();

    assert!(matches!(storage::load(&path), Err(ArtifactError::UnsupportedFormat(_))));
}

#[test]
fn test_save_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.json");
    storage::save(&path, &artifact()).unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["model.json".to_string()]);
}

#[test]
fn test_save_replaces_previous_artifact() {
    let dir = tempdir().unwrap();
    let store = FileArtifactStore::new(dir.path().join("model.json"));

    let first = artifact();
    let second = artifact();
    assert_ne!(first.id, second.id);

    store.save(&first).unwrap();
    store.save(&second).unwrap();
    assert_eq!(store.load().unwrap().map(|a| a.id), Some(second.id));
    assert!(store.location().ends_with("model.json"));
}

#[test]
fn test_summary_reports_layout() {
    let artifact = artifact();
    let summary = artifact.summary();
    assert_eq!(summary.id, artifact.id);
    assert_eq!(summary.feature_count, artifact.feature_names.len());
    assert_eq!(summary.n_trees, 15);
    assert_eq!(summary.layout_hash, format!("{:08x}", artifact.layout_hash));
    assert_eq!(artifact.layout().feature_names, artifact.feature_names);
}
