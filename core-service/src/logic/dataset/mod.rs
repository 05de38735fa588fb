//! Dataset Module - Canonical Training Data
//!
//! Labeled claims are read once per training cycle from a `TrainingSource`.
//! The canonical source is a CSV file with the claim columns plus `FraudLabel`.

pub mod reader;
pub mod record;
pub mod synthetic;
pub mod writer;


use thiserror::Error;

pub use reader::{read_claims, CsvDataset};
pub use record::{parse_label, LabeledClaim};
pub use writer::{write_claims, write_csv};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing column {0}")]
    MissingColumn(String),

    #[error("invalid value '{value}' for {column} at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("dataset has no rows")]
    Empty,

    #[error("dataset contains only one class")]
    SingleClass,
}

/// Supplier of labeled training rows
pub trait TrainingSource: Send + Sync {
    fn load(&self) -> Result<Vec<LabeledClaim>, DatasetError>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Rows held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataset {
    rows: Vec<LabeledClaim>,
}

impl InMemoryDataset {
    pub fn new(rows: Vec<LabeledClaim>) -> Self {
        Self { rows }
    }

    /// Deterministic synthetic rows
    pub fn synthetic(n: usize, seed: u64) -> Self {
        Self::new(synthetic::generate(n, seed))
    }
}

impl TrainingSource for InMemoryDataset {
    fn load(&self) -> Result<Vec<LabeledClaim>, DatasetError> {
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        format!("memory:{} rows", self.rows.len())
    }
}

/// Reject datasets a classifier cannot be fitted on
pub fn check_trainable(rows: &[LabeledClaim]) -> Result<(), DatasetError> {
    if rows.is_empty() {
        return Err(DatasetError::Empty);
    }

    let fraud = rows.iter().filter(|r| r.is_fraud()).count();
    if fraud == 0 || fraud == rows.len() {
        return Err(DatasetError::SingleClass);
    }

    Ok(())
}
