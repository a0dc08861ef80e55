//! Process optimizer — thin orchestrator over scoring and rule evaluation.

use crate::types::{
    GeometryParameters, OptimizationResult, PredictionResult, ProcessParameters, QualityScore,
};

use super::rules::generate_suggestions;
use super::scoring::calculate_quality_score;

/// Research-backed optimal operating windows, for documentation and UI
/// guidance. Not enforced anywhere in the core.
pub mod optimal_ranges {
    /// Melt temperature (°C)
    pub const MELT_TEMP: (f64, f64) = (220.0, 240.0);
    /// Mold temperature (°C)
    pub const MOLD_TEMP: (f64, f64) = (45.0, 65.0);
    /// Injection pressure (MPa)
    pub const INJECTION_PRESSURE: (f64, f64) = (40.0, 90.0);
    /// Holding pressure (MPa)
    pub const HOLDING_PRESSURE: (f64, f64) = (50.0, 75.0);
    /// Holding time (s)
    pub const HOLDING_TIME: (f64, f64) = (10.0, 20.0);
    /// Cooling time (s)
    pub const COOLING_TIME: (f64, f64) = (25.0, 45.0);
}

/// One request/response unit: the quality score for the current prediction
/// plus the rule engine's suggestions.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    /// Quality score of the prediction as-is
    pub current_quality: QualityScore,
    /// Suggestions and optimized parameter set
    pub result: OptimizationResult,
}

/// Stateless orchestrator bundling the quality scorer and the rule engine.
///
/// Performs no iterative refinement: the caller re-invokes the predictor on
/// `optimized_parameters` to obtain a projected quality score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptimizer;

impl ProcessOptimizer {
    /// Create an optimizer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Score the current prediction and evaluate the suggestion rules.
    #[must_use]
    pub fn optimize(
        &self,
        process: &ProcessParameters,
        geometry: &GeometryParameters,
        predictions: &PredictionResult,
    ) -> OptimizationOutcome {
        let current_quality =
            calculate_quality_score(predictions.warpage_percent, predictions.sinkage_percent);
        let result = generate_suggestions(process, geometry, predictions);

        OptimizationOutcome {
            current_quality,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimize_bundles_score_and_suggestions() {
        let process = ProcessParameters {
            melt_temp: 245.0,
            mold_temp: 40.0,
            injection_pressure: 60.0,
            holding_pressure: 55.0,
            holding_time: 8.0,
            cooling_time: 25.0,
        };
        let geometry = GeometryParameters {
            wall_thickness: 3.5,
            part_volume: 100.0,
            aspect_ratio: 2.0,
        };
        let predictions = PredictionResult {
            warpage_percent: 8.5,
            sinkage_percent: 4.2,
        };

        let outcome = ProcessOptimizer::new().optimize(&process, &geometry, &predictions);

        // Score reflects the prediction as-is
        assert!((outcome.current_quality.warpage_score - 15.0).abs() < 1e-9);
        assert!((outcome.current_quality.sinkage_score - 16.0).abs() < 1e-9);
        assert!(!outcome.current_quality.meets_target);

        // Rule engine ran the same single pass
        assert_eq!(outcome.result.suggestion_count, 4);
        assert_eq!(outcome.result.optimized_parameters.injection_pressure, 60.0);
    }

    #[test]
    fn test_optimal_ranges_are_ordered() {
        for (lo, hi) in [
            optimal_ranges::MELT_TEMP,
            optimal_ranges::MOLD_TEMP,
            optimal_ranges::INJECTION_PRESSURE,
            optimal_ranges::HOLDING_PRESSURE,
            optimal_ranges::HOLDING_TIME,
            optimal_ranges::COOLING_TIME,
        ] {
            assert!(lo < hi);
        }
    }
}
