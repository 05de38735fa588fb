//! Encoding Module - Encoder/Scaler Store
//!
//! Fitted once on training data, then applied unchanged at inference.
//! Column roles come from `FEATURE_LAYOUT`, never from runtime value types.
//!
//! Unseen categorical values map to code 0. This is a fallback, not an
//! error: it is logged and counted via `unseen_category_count()`.

pub mod code_table;
pub mod scaler;

use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::claim::{ColumnKind, FeatureValue};
use crate::logic::features::{EngineeredFeatures, FEATURE_LAYOUT};

pub use code_table::CodeTable;
pub use scaler::ScalerStats;

/// Code used for categorical values absent from the table
pub const UNSEEN_CATEGORY_CODE: u32 = 0;

// ============================================================================
// STATE
// ============================================================================

static UNSEEN_CATEGORIES: AtomicU64 = AtomicU64::new(0);

/// Unseen categorical values encountered since process start
pub fn unseen_category_count() -> u64 {
    UNSEEN_CATEGORIES.load(Ordering::Relaxed)
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("no rows to fit encoders on")]
    Empty,

    #[error("column {column} expected {expected:?} values, got {actual:?}")]
    KindMismatch {
        column: String,
        expected: ColumnKind,
        actual: ColumnKind,
    },
}

// ============================================================================
// COLUMN ENCODERS
// ============================================================================

/// Fitted state for one feature column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnEncoder {
    Categorical { name: String, table: CodeTable },
    Numeric { name: String, stats: ScalerStats },
}

impl ColumnEncoder {
    pub fn name(&self) -> &str {
        match self {
            ColumnEncoder::Categorical { name, .. } | ColumnEncoder::Numeric { name, .. } => name,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnEncoder::Categorical { .. } => ColumnKind::Categorical,
            ColumnEncoder::Numeric { .. } => ColumnKind::Numeric,
        }
    }

    fn encode(&self, value: &FeatureValue) -> f64 {
        match (self, value) {
            (ColumnEncoder::Categorical { name, table }, value) => {
                let text = match value {
                    FeatureValue::Categorical(s) => s.clone(),
                    FeatureValue::Numeric(v) => v.to_string(),
                };
                let code = table.code(&text).unwrap_or_else(|| {
                    UNSEEN_CATEGORIES.fetch_add(1, Ordering::Relaxed);
                    log::warn!("Unseen category '{}' in column {}, using code {}", text, name, UNSEEN_CATEGORY_CODE);
                    UNSEEN_CATEGORY_CODE
                });
                f64::from(code)
            }
            (ColumnEncoder::Numeric { stats, .. }, FeatureValue::Numeric(v)) => stats.apply(*v),
            (ColumnEncoder::Numeric { name, stats }, FeatureValue::Categorical(s)) => {
                log::warn!("Non-numeric value '{}' in numeric column {}, using mean", s, name);
                stats.apply(stats.mean)
            }
        }
    }
}

// ============================================================================
// FITTED ENCODERS
// ============================================================================

/// Per-column code tables and scaler statistics, in layout order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedEncoders {
    columns: Vec<ColumnEncoder>,
}

impl FittedEncoders {
    /// Fit code tables and scaler stats from engineered training rows
    pub fn fit(rows: &[EngineeredFeatures]) -> Result<Self, EncodingError> {
        if rows.is_empty() {
            return Err(EncodingError::Empty);
        }

        let mut columns = Vec::with_capacity(FEATURE_LAYOUT.len());

        for (index, spec) in FEATURE_LAYOUT.iter().enumerate() {
            let cells = rows.iter().filter_map(|r| r.get(index));

            if let Some(bad) = rows
                .iter()
                .filter_map(|r| r.get(index))
                .find(|v| v.kind() != spec.kind)
            {
                return Err(EncodingError::KindMismatch {
                    column: spec.name.to_string(),
                    expected: spec.kind,
                    actual: bad.kind(),
                });
            }

            let encoder = match spec.kind {
                ColumnKind::Categorical => ColumnEncoder::Categorical {
                    name: spec.name.to_string(),
                    table: CodeTable::fit(cells.filter_map(FeatureValue::as_str)),
                },
                ColumnKind::Numeric => {
                    let values: Vec<f64> = cells.filter_map(FeatureValue::as_f64).collect();
                    ColumnEncoder::Numeric {
                        name: spec.name.to_string(),
                        stats: ScalerStats::fit(&values),
                    }
                }
            };
            columns.push(encoder);
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnEncoder] {
        &self.columns
    }

    /// Code table for a categorical column
    pub fn code_table(&self, name: &str) -> Option<&CodeTable> {
        self.columns.iter().find_map(|c| match c {
            ColumnEncoder::Categorical { name: n, table } if n == name => Some(table),
            _ => None,
        })
    }

    /// Scaler stats for a numeric column
    pub fn scaler(&self, name: &str) -> Option<&ScalerStats> {
        self.columns.iter().find_map(|c| match c {
            ColumnEncoder::Numeric { name: n, stats } if n == name => Some(stats),
            _ => None,
        })
    }

    /// Encode one engineered row into classifier input
    pub fn transform(&self, features: &EngineeredFeatures) -> Vec<f64> {
        self.columns
            .iter()
            .zip(features.values())
            .map(|(encoder, value)| encoder.encode(value))
            .collect()
    }

    /// Encode many rows into a (rows x features) matrix
    pub fn transform_matrix(&self, rows: &[EngineeredFeatures]) -> Array2<f64> {
        let width = self.columns.len();
        let mut matrix = Array2::<f64>::zeros((rows.len(), width));

        for (mut out, row) in matrix.outer_iter_mut().zip(rows) {
            for (cell, value) in out.iter_mut().zip(self.transform(row)) {
                *cell = value;
            }
        }

        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::claim::ClaimRecord;
    use crate::logic::features::{engineer, feature_index, FEATURE_COUNT};

    fn training_rows() -> Vec<EngineeredFeatures> {
        let regions = ["Khomas", "Erongo", "Oshana", "Hardap"];
        regions
            .iter()
            .enumerate()
            .map(|(i, region)| {
                engineer(&ClaimRecord {
                    region: region.to_string(),
                    past_number_of_claims: i as f64,
                    ..ClaimRecord::sample()
                })
            })
            .collect()
    }

    #[test]
    fn test_fit_follows_layout() {
        let encoders = FittedEncoders::fit(&training_rows()).unwrap();
        assert_eq!(encoders.columns().len(), FEATURE_COUNT);
        for (encoder, spec) in encoders.columns().iter().zip(FEATURE_LAYOUT) {
            assert_eq!(encoder.name(), spec.name);
            assert_eq!(encoder.kind(), spec.kind);
        }
    }

    #[test]
    fn test_fit_empty_rejected() {
        assert!(matches!(FittedEncoders::fit(&[]), Err(EncodingError::Empty)));
    }

    #[test]
    fn test_transform_codes_and_scales() {
        let rows = training_rows();
        let encoders = FittedEncoders::fit(&rows).unwrap();

        let region = feature_index("Region").unwrap();
        let claims = feature_index("PastNumberOfClaims").unwrap();

        // Erongo < Hardap < Khomas < Oshana
        let encoded = encoders.transform(&rows[0]);
        assert_eq!(encoded[region], 2.0);

        // claims 0,1,2,3: mean 1.5, population std sqrt(1.25)
        let expected = (0.0 - 1.5) / 1.25f64.sqrt();
        assert!((encoded[claims] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unseen_category_maps_to_zero_and_counts() {
        let encoders = FittedEncoders::fit(&training_rows()).unwrap();
        let before = unseen_category_count();

        let unseen = engineer(&ClaimRecord {
            region: "Zambezi".into(),
            ..ClaimRecord::sample()
        });
        let encoded = encoders.transform(&unseen);

        assert_eq!(encoded[feature_index("Region").unwrap()], 0.0);
        assert!(unseen_category_count() > before);
    }

    #[test]
    fn test_transform_matrix_shape() {
        let rows = training_rows();
        let encoders = FittedEncoders::fit(&rows).unwrap();
        let matrix = encoders.transform_matrix(&rows);
        assert_eq!(matrix.dim(), (rows.len(), FEATURE_COUNT));
        assert_eq!(matrix.row(1).to_vec(), encoders.transform(&rows[1]));
    }

    #[test]
    fn test_lookup_helpers() {
        let encoders = FittedEncoders::fit(&training_rows()).unwrap();
        assert_eq!(encoders.code_table("Region").map(CodeTable::len), Some(4));
        assert!(encoders.code_table("PastNumberOfClaims").is_none());
        assert!(encoders.scaler("PastNumberOfClaims").is_some());
    }
}
