//! Central Configuration Constants
//!
//! Single source of truth for scoring defaults.
//! Hyperparameters and thresholds live here so training and inference agree.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "ClaimGuard";

/// Directory name under the platform data dir
pub const DATA_DIR_NAME: &str = "claimguard";

/// Default artifact file name
pub const DEFAULT_ARTIFACT_FILE: &str = "fraud_detection_model.json";

/// Default canonical training dataset
pub const DEFAULT_DATASET_PATH: &str = "data/insurance_fraud_datasetCOMBINED.csv";

/// Label column of the canonical dataset
pub const LABEL_COLUMN: &str = "FraudLabel";

// ============================================
// Classifier hyperparameters
// ============================================

pub const N_ESTIMATORS: usize = 200;
pub const LEARNING_RATE: f64 = 0.1;
pub const MAX_DEPTH: usize = 8;
pub const MIN_SAMPLES_SPLIT: usize = 10;
pub const MIN_SAMPLES_LEAF: usize = 4;
pub const RANDOM_SEED: u64 = 42;

// ============================================
// Decision thresholds
// ============================================

/// Hard label cut-off on the classifier probability
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Probability at or above which a claim is HIGH risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Probability at or above which a claim is MEDIUM risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Heuristic probability clamp
pub const HEURISTIC_MIN_PROBABILITY: f64 = 0.05;
pub const HEURISTIC_MAX_PROBABILITY: f64 = 0.95;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get artifact path from environment or use default
pub fn get_artifact_path() -> std::path::PathBuf {
    std::env::var("ARTIFACT_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_artifact_path())
}

/// Get dataset path from environment or use default
pub fn get_dataset_path() -> std::path::PathBuf {
    std::env::var("DATASET_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from(DEFAULT_DATASET_PATH))
}

/// Default artifact location under the platform data dir
pub fn default_artifact_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(DATA_DIR_NAME)
        .join(DEFAULT_ARTIFACT_FILE)
}
