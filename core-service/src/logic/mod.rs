//! Logic Module - Scoring Pipeline
//!
//! ## Layout
//! - `claim/` - raw claim record and column schema
//! - `features/` - derived indicators and the versioned feature layout
//! - `encoding/` - categorical code tables and numeric scaling
//! - `model/` - gradient-boosted classifier, training, inference
//! - `heuristic/` - additive rule scorer
//! - `artifact/` - persisted classifier bundle
//! - `dataset/` - labeled training rows (CSV, synthetic)
//! - `engine/` - lifecycle, drift recovery, dispatch

pub mod artifact;
pub mod claim;
pub mod config;
pub mod dataset;
pub mod encoding;
pub mod engine;
pub mod features;
pub mod heuristic;
pub mod model;
pub mod prediction;
