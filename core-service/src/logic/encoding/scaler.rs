//! Numeric standardization statistics

use serde::{Deserialize, Serialize};

/// Training-time (mean, std) of one numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalerStats {
    pub mean: f64,
    /// Population standard deviation; a constant column stores 1.0
    pub std: f64,
}

impl ScalerStats {
    /// Non-finite values are left out of the statistics
    pub fn fit(values: &[f64]) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Self { mean: 0.0, std: 1.0 };
        }

        let n = finite.len() as f64;
        let mean = finite.iter().sum::<f64>() / n;
        let variance = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        Self {
            mean,
            std: if std > 0.0 && std.is_finite() { std } else { 1.0 },
        }
    }

    /// `(x - mean) / std`; a non-finite input maps to the mean (0.0)
    pub fn apply(&self, x: f64) -> f64 {
        if !x.is_finite() {
            return 0.0;
        }
        (x - self.mean) / self.std
    }
}
