//! Claim Module - raw claim record and its declared schema

pub mod record;
pub mod schema;

pub use record::{ClaimRecord, FieldError, UNKNOWN_FRAUD_TYPE};
pub use schema::{raw_column, ColumnKind, ColumnSpec, FeatureValue, PERSONAL_COLUMNS, RAW_COLUMNS};
