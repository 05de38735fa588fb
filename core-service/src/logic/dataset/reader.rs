//! Canonical CSV dataset reader
//!
//! Header-driven: columns are matched by name, extra columns (including the
//! personal identifiers) are ignored. `FraudType` may be absent.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};

use super::record::{parse_label, LabeledClaim};
use super::{DatasetError, TrainingSource};
use crate::constants::LABEL_COLUMN;
use crate::logic::claim::{ClaimRecord, FieldError, RAW_COLUMNS};

/// Columns that may be missing from the header
const OPTIONAL_COLUMNS: &[&str] = &["FraudType"];

/// Read labeled claims from any CSV source
pub fn read_claims<R: Read>(source: R) -> Result<Vec<LabeledClaim>, DatasetError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    check_headers(&headers)?;

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        // header is line 1
        let row = index + 2;

        let fields: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();

        let claim = ClaimRecord::from_fields(&fields).map_err(|e| match e {
            FieldError::Missing(column) => DatasetError::MissingColumn(column),
            FieldError::InvalidNumber { column, value } => DatasetError::InvalidValue { row, column, value },
            FieldError::Negative { column, value } => DatasetError::InvalidValue {
                row,
                column,
                value: value.to_string(),
            },
        })?;

        let raw_label = fields.get(LABEL_COLUMN).map(String::as_str).unwrap_or_default();
        let label = parse_label(raw_label).ok_or_else(|| DatasetError::InvalidValue {
            row,
            column: LABEL_COLUMN.to_string(),
            value: raw_label.to_string(),
        })?;

        rows.push(LabeledClaim { claim, label });
    }

    Ok(rows)
}

fn check_headers(headers: &StringRecord) -> Result<(), DatasetError> {
    let present = |name: &str| headers.iter().any(|h| h == name);

    for column in RAW_COLUMNS {
        if !present(column.name) && !OPTIONAL_COLUMNS.contains(&column.name) {
            return Err(DatasetError::MissingColumn(column.name.to_string()));
        }
    }
    if !present(LABEL_COLUMN) {
        return Err(DatasetError::MissingColumn(LABEL_COLUMN.to_string()));
    }

    Ok(())
}

/// The canonical training dataset on local disk
#[derive(Debug, Clone)]
pub struct CsvDataset {
    path: PathBuf,
}

impl CsvDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrainingSource for CsvDataset {
    fn load(&self) -> Result<Vec<LabeledClaim>, DatasetError> {
        let file = std::fs::File::open(&self.path)?;
        let rows = read_claims(file)?;
        log::info!("Read {} labeled claims from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}
