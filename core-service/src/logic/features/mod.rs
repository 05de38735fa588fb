//! Features Module - Feature Engineering
//!
//! Turns a raw claim into the versioned, layout-ordered vector that the
//! encoder and classifier consume.

pub mod engineer;
pub mod layout;
pub mod vector;


pub use engineer::{engineer, DerivedFeatures};
pub use layout::{
    feature_index, feature_names, layout_hash, validate_feature_names, LayoutInfo, LayoutMismatch,
    FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, RAW_FEATURE_COUNT,
};
pub use vector::EngineeredFeatures;
