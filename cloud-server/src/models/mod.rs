//! Data models

pub mod claim;
pub mod performance;
pub mod prediction;

pub use claim::*;
pub use performance::*;
pub use prediction::*;
