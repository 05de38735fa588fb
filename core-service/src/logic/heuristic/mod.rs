//! Heuristic Module - rule-based fraud scorer
//!
//! Works without any trained artifact. `rules.rs` holds weights and tiers,
//! `scorer.rs` evaluates them.

pub mod rules;
pub mod scorer;

pub use scorer::{evaluate, risk_level, score, score_to_probability, RuleHit};
