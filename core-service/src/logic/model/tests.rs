use super::*;
use crate::logic::claim::ClaimRecord;
use crate::logic::dataset::{synthetic, LabeledClaim};
use crate::logic::features::{layout_hash, FEATURE_COUNT, FEATURE_VERSION};

fn quick_params() -> BoostingParams {
    BoostingParams { n_estimators: 25, ..BoostingParams::default() }
}

fn trained() -> crate::logic::artifact::TrainedArtifact {
    train_artifact_with(&synthetic::generate(300, 11), quick_params()).unwrap()
}

#[test]
fn test_artifact_records_current_layout() {
    let artifact = trained();
    assert_eq!(artifact.feature_version, FEATURE_VERSION);
    assert_eq!(artifact.layout_hash, layout_hash());
    assert_eq!(artifact.feature_names.len(), FEATURE_COUNT);
    assert_eq!(artifact.encoders.columns().len(), FEATURE_COUNT);
    assert_eq!(artifact.classifier.n_trees(), 25);
    assert!(artifact.check_layout().is_ok());
}

#[test]
fn test_training_metrics_are_populated() {
    let artifact = trained();
    let m = artifact.metrics;
    assert_eq!(m.dataset_size, 300);
    assert_eq!(m.fraud_cases + m.non_fraud_cases, 300);
    assert!(m.accuracy > 0.5);
    assert!(m.roc_auc.is_some());
}

#[test]
fn test_predict_scores_claim() {
    let artifact = trained();
    match predict(&artifact, &ClaimRecord::sample()) {
        InferenceOutcome::Scored(result) => {
            assert!((0.0..=1.0).contains(&result.probability));
            assert_eq!(result.prediction, result.probability >= 0.5);
            assert_eq!(result.risk_level, RiskLevel::from_probability(result.probability));
            assert!(result.risk_factors.is_none());
            assert!(result.raw_score.is_none());
            assert_eq!(result.model_name(), "Gradient Boosting");
        }
        InferenceOutcome::SchemaMismatch(m) => panic!("unexpected drift: {m}"),
    }
}

#[test]
fn test_predict_is_deterministic() {
    let artifact = trained();
    let claim = synthetic::generate(1, 99).remove(0).claim;
    assert_eq!(predict(&artifact, &claim), predict(&artifact, &claim));
}

#[test]
fn test_unseen_category_still_scores() {
    let artifact = trained();
    let claim = ClaimRecord {
        region: "Atlantis".into(),
        vehicle_category: "Hovercraft".into(),
        ..ClaimRecord::sample()
    };
    assert!(matches!(predict(&artifact, &claim), InferenceOutcome::Scored(_)));
}

#[test]
fn test_stale_feature_list_is_schema_mismatch() {
    let mut artifact = trained();
    artifact.feature_names.retain(|n| n != "WeatherRisk");

    match predict(&artifact, &ClaimRecord::sample()) {
        InferenceOutcome::SchemaMismatch(m) => {
            assert_eq!(m.expected_count, FEATURE_COUNT - 1);
            assert_eq!(m.actual_count, FEATURE_COUNT);
        }
        InferenceOutcome::Scored(_) => panic!("drift not detected"),
    }
}

#[test]
fn test_stale_version_is_schema_mismatch() {
    let mut artifact = trained();
    artifact.feature_version += 1;
    assert!(matches!(
        predict(&artifact, &ClaimRecord::sample()),
        InferenceOutcome::SchemaMismatch(_)
    ));
}

#[test]
fn test_training_rejects_degenerate_data() {
    assert!(matches!(train_artifact(&[]), Err(TrainingError::EmptyDataset)));

    let one_class: Vec<_> = (0..20).map(|_| LabeledClaim::new(ClaimRecord::sample(), true)).collect();
    assert!(matches!(
        train_artifact_with(&one_class, quick_params()),
        Err(TrainingError::SingleClass)
    ));
}

#[test]
fn test_inference_stats_count_calls() {
    let artifact = trained();
    let before = inference_stats().inference_count;
    let _ = predict(&artifact, &ClaimRecord::sample());
    assert!(inference_stats().inference_count > before);
}
