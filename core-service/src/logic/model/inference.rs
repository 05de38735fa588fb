//! Inference - classifier path for a single claim
//!
//! The layout check runs before any encoding. A mismatch is returned as a
//! value so the caller decides what to do about drift.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::risk::{decide, RiskLevel};
use crate::logic::artifact::TrainedArtifact;
use crate::logic::claim::ClaimRecord;
use crate::logic::features::{engineer, LayoutMismatch};
use crate::logic::prediction::{PredictionResult, ScoringMethod};

// ============================================================================
// STATE
// ============================================================================

/// Latency stats
static LATENCY_SUM_US: AtomicU64 = AtomicU64::new(0);
static INFERENCE_COUNT: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InferenceStats {
    pub inference_count: u64,
    pub avg_latency_us: f64,
}

pub fn inference_stats() -> InferenceStats {
    let sum = LATENCY_SUM_US.load(Ordering::Relaxed);
    let count = INFERENCE_COUNT.load(Ordering::Relaxed);
    InferenceStats {
        inference_count: count,
        avg_latency_us: if count > 0 { sum as f64 / count as f64 } else { 0.0 },
    }
}

// ============================================================================
// PREDICT
// ============================================================================

/// Result of one classifier call
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutcome {
    Scored(PredictionResult),
    SchemaMismatch(LayoutMismatch),
}

/// Score a claim with a trained artifact
pub fn predict(artifact: &TrainedArtifact, claim: &ClaimRecord) -> InferenceOutcome {
    if let Err(mismatch) = artifact.check_layout() {
        return InferenceOutcome::SchemaMismatch(mismatch);
    }

    let started = Instant::now();

    let features = engineer(claim);
    let row = artifact.encoders.transform(&features);
    let probability = artifact.classifier.predict_probability(&row);

    LATENCY_SUM_US.fetch_add(started.elapsed().as_micros() as u64, Ordering::Relaxed);
    INFERENCE_COUNT.fetch_add(1, Ordering::Relaxed);

    InferenceOutcome::Scored(PredictionResult {
        prediction: decide(probability),
        probability,
        risk_level: RiskLevel::from_probability(probability),
        risk_factors: None,
        raw_score: None,
        method: ScoringMethod::GradientBoosting,
    })
}
