//! ClaimGuard Core - insurance claim fraud scoring
//!
//! Feature engineering, the gradient-boosted classifier, the rule-based
//! scorer and the engine that keeps a trained artifact consistent with the
//! live feature layout.

pub mod constants;
pub mod logic;

pub use logic::config::{EngineConfig, ScoringMode};
pub use logic::engine::{ArtifactState, EngineStatus, FraudEngine, ScoringError};
pub use logic::prediction::{PredictionResult, ScoringMethod};
