//! Per-feature standardization fitted once on the training set.
//!
//! Unlike an online normalizer, the statistics here are computed in one pass
//! over the full training matrix and frozen: every later inference call must
//! standardize with the exact statistics used at training time.

use serde::{Deserialize, Serialize};

use crate::types::NUM_FEATURES;

/// Frozen column-wise mean/standard-deviation statistics.
///
/// A `ScalerState` only exists after a fit, so transform-before-fit is
/// unrepresentable. Standard deviations are assumed to be strictly positive;
/// there is no zero-variance guard (the supported synthetic training path
/// draws every feature from a continuous uniform range, so a constant column
/// cannot occur).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    mean: [f64; NUM_FEATURES],
    std: [f64; NUM_FEATURES],
}

impl ScalerState {
    /// Compute column-wise mean and population standard deviation.
    #[must_use]
    pub fn fit(samples: &[[f64; NUM_FEATURES]]) -> Self {
        let n = samples.len() as f64;
        let mut mean = [0.0_f64; NUM_FEATURES];
        let mut std = [0.0_f64; NUM_FEATURES];

        for row in samples {
            for (m, x) in mean.iter_mut().zip(row.iter()) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        for row in samples {
            for i in 0..NUM_FEATURES {
                let d = row[i] - mean[i];
                std[i] += d * d;
            }
        }
        for s in &mut std {
            *s = (*s / n).sqrt();
        }

        Self { mean, std }
    }

    /// Standardize one raw feature vector: `(x - mean) / std` per dimension.
    #[must_use]
    pub fn transform(&self, raw: &[f64; NUM_FEATURES]) -> [f64; NUM_FEATURES] {
        let mut out = [0.0_f64; NUM_FEATURES];
        for i in 0..NUM_FEATURES {
            out[i] = (raw[i] - self.mean[i]) / self.std[i];
        }
        out
    }

    /// Standardize a whole matrix (training-time convenience).
    #[must_use]
    pub fn transform_all(&self, rows: &[[f64; NUM_FEATURES]]) -> Vec<[f64; NUM_FEATURES]> {
        rows.iter().map(|r| self.transform(r)).collect()
    }

    /// Fitted per-feature means.
    #[must_use]
    pub fn mean(&self) -> &[f64; NUM_FEATURES] {
        &self.mean
    }

    /// Fitted per-feature standard deviations.
    #[must_use]
    pub fn std(&self) -> &[f64; NUM_FEATURES] {
        &self.std
    }
}
