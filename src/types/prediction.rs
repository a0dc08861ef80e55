//! Defect prediction and quality scoring output types.

use serde::{Deserialize, Serialize};

/// Predicted defect levels for one parameter set.
///
/// Both values are clamped at zero: the regressors can emit small negative
/// outputs near the low end of the training range, which are not physical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted warpage (%, ≥ 0)
    pub warpage_percent: f64,
    /// Predicted sinkage (%, ≥ 0)
    pub sinkage_percent: f64,
}

/// Composite quality score derived from warpage and sinkage predictions.
///
/// Warpage and sinkage each contribute 50%. The documented research reference
/// values are 6.9% warpage and 0.99mm sinkage (the latter is quoted in mm in
/// the source research while the scoring math treats sinkage as a percentage;
/// that inconsistency is preserved as observed).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    /// Combined score (0-100)
    pub overall_quality: f64,
    /// Warpage sub-score: 100 at 0% warpage, 0 at ≥10% warpage
    pub warpage_score: f64,
    /// Sinkage sub-score: 100 at 0% sinkage, 0 at ≥5% sinkage
    pub sinkage_score: f64,
    /// Whether the overall score meets the ≥95 production target
    pub meets_target: bool,
}

/// Quality rating tier (inclusive lower bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityRating {
    /// ≥95
    Excellent,
    /// ≥85
    Good,
    /// ≥75
    Acceptable,
    /// ≥60
    NeedsImprovement,
    /// <60
    Poor,
}

impl QualityRating {
    /// Classify an overall quality score into a rating tier.
    #[must_use]
    pub fn from_score(overall_quality: f64) -> Self {
        match overall_quality {
            s if s >= 95.0 => Self::Excellent,
            s if s >= 85.0 => Self::Good,
            s if s >= 75.0 => Self::Acceptable,
            s if s >= 60.0 => Self::NeedsImprovement,
            _ => Self::Poor,
        }
    }
}

impl std::fmt::Display for QualityRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "EXCELLENT"),
            Self::Good => write!(f, "GOOD"),
            Self::Acceptable => write!(f, "ACCEPTABLE"),
            Self::NeedsImprovement => write!(f, "NEEDS IMPROVEMENT"),
            Self::Poor => write!(f, "POOR"),
        }
    }
}
