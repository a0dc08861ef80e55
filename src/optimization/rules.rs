//! Rule-based suggestion engine.
//!
//! Seven heuristic rules from injection-molding practice are evaluated in a
//! fixed order against the ORIGINAL prediction — a single pass, never
//! re-evaluated against intermediate optimized values. Each triggered rule
//! appends one suggestion and overwrites one field of a working copy of the
//! process parameters, except the wall-thickness rule, which is advisory
//! only (geometry is a part-design property, not a machine setting).
//!
//! All thresholds are strict comparisons: a value exactly equal to a
//! threshold never triggers. That boundary behavior is intentional.

use tracing::debug;

use crate::types::{
    AdjustableParameter, GeometryParameters, OptimizationResult, PredictionResult, Priority,
    ProcessParameters, Suggestion,
};

/// Warpage level above which melt-temperature rules engage (%).
const WARPAGE_MELT_THRESHOLD: f64 = 3.0;
/// Warpage level above which the cooling-time rule engages (%).
const WARPAGE_COOLING_THRESHOLD: f64 = 3.5;
/// Warpage level below which the part fills well enough to pack harder (%).
const WARPAGE_LOW_THRESHOLD: f64 = 2.0;
/// Sinkage level above which the mold-temperature rule engages (%).
const SINKAGE_MOLD_THRESHOLD: f64 = 4.0;
/// Sinkage level above which the holding-pressure rule engages (%).
const SINKAGE_PACKING_THRESHOLD: f64 = 3.5;
/// Sinkage level above which holding-time / injection-pressure rules engage (%).
const SINKAGE_TIME_THRESHOLD: f64 = 3.0;
/// Wall thickness above which thick-wall defects are flagged (mm).
const THICK_WALL_THRESHOLD: f64 = 3.5;

/// Evaluate all rules and produce suggestions plus optimized parameters.
///
/// Deterministic pure function: identical inputs always yield an identical
/// `OptimizationResult`.
#[must_use]
pub fn generate_suggestions(
    process: &ProcessParameters,
    geometry: &GeometryParameters,
    predictions: &PredictionResult,
) -> OptimizationResult {
    let mut suggestions = Vec::new();
    let mut optimized = *process;

    let warpage = predictions.warpage_percent;
    let sinkage = predictions.sinkage_percent;

    // Rule 1: melt temperature (1b only considered when 1a does not fire)
    if warpage > WARPAGE_MELT_THRESHOLD {
        if process.melt_temp > 240.0 {
            suggestions.push(Suggestion {
                parameter: AdjustableParameter::MeltTemp,
                issue: format!("High warpage ({warpage:.2}%)"),
                current: process.melt_temp,
                suggested: 225.0,
                impact: "Reduce by 10-15°C to lower thermal stress".to_string(),
                priority: Priority::High,
            });
            optimized.melt_temp = 225.0;
        } else if process.melt_temp < 200.0 {
            suggestions.push(Suggestion {
                parameter: AdjustableParameter::MeltTemp,
                issue: "Low fluidity, inadequate fill".to_string(),
                current: process.melt_temp,
                suggested: 230.0,
                impact: "Increase to improve flow".to_string(),
                priority: Priority::Medium,
            });
            optimized.melt_temp = 230.0;
        }
    }

    // Rule 2: mold temperature
    if sinkage > SINKAGE_MOLD_THRESHOLD && process.mold_temp < 45.0 {
        suggestions.push(Suggestion {
            parameter: AdjustableParameter::MoldTemp,
            issue: format!("High sinkage ({sinkage:.2}%)"),
            current: process.mold_temp,
            suggested: 55.0,
            impact: "Increase to improve cooling uniformity".to_string(),
            priority: Priority::High,
        });
        optimized.mold_temp = 55.0;
    }

    // Rule 3: holding pressure
    if sinkage > SINKAGE_PACKING_THRESHOLD && process.holding_pressure < 50.0 {
        suggestions.push(Suggestion {
            parameter: AdjustableParameter::HoldingPressure,
            issue: format!("Inadequate packing ({sinkage:.2}% sinkage)"),
            current: process.holding_pressure,
            suggested: 65.0,
            impact: "Increase to compensate for material shrinkage".to_string(),
            priority: Priority::High,
        });
        optimized.holding_pressure = 65.0;
    }

    // Rule 4: holding time
    if sinkage > SINKAGE_TIME_THRESHOLD && process.holding_time < 10.0 {
        suggestions.push(Suggestion {
            parameter: AdjustableParameter::HoldingTime,
            issue: "Short packing time causes sinkage".to_string(),
            current: process.holding_time,
            suggested: 15.0,
            impact: "Extend to ensure proper material packing".to_string(),
            priority: Priority::Medium,
        });
        optimized.holding_time = 15.0;
    }

    // Rule 5: cooling time
    if warpage > WARPAGE_COOLING_THRESHOLD && process.cooling_time < 30.0 {
        suggestions.push(Suggestion {
            parameter: AdjustableParameter::CoolingTime,
            issue: "Insufficient cooling causes warpage".to_string(),
            current: process.cooling_time,
            suggested: 40.0,
            impact: "Extend to reduce thermal gradients".to_string(),
            priority: Priority::High,
        });
        optimized.cooling_time = 40.0;
    }

    // Rule 6: injection pressure (only when the part already fills flat)
    if warpage < WARPAGE_LOW_THRESHOLD
        && sinkage > SINKAGE_TIME_THRESHOLD
        && process.injection_pressure < 60.0
    {
        suggestions.push(Suggestion {
            parameter: AdjustableParameter::InjectionPressure,
            issue: "Low fill pressure, high sinkage".to_string(),
            current: process.injection_pressure,
            suggested: 75.0,
            impact: "Increase for better mold filling".to_string(),
            priority: Priority::Medium,
        });
        optimized.injection_pressure = 75.0;
    }

    // Rule 7: wall thickness — advisory only, no parameter mutation
    if geometry.wall_thickness > THICK_WALL_THRESHOLD {
        suggestions.push(Suggestion {
            parameter: AdjustableParameter::WallThickness,
            issue: "Thick walls increase cooling time and defects".to_string(),
            current: geometry.wall_thickness,
            suggested: 2.5,
            impact: "Reduce wall thickness to improve quality".to_string(),
            priority: Priority::Medium,
        });
    }

    debug!(
        warpage,
        sinkage,
        triggered = suggestions.len(),
        "rule evaluation complete"
    );

    let suggestion_count = suggestions.len();
    OptimizationResult {
        suggestions,
        optimized_parameters: optimized,
        suggestion_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline_process() -> ProcessParameters {
        ProcessParameters {
            melt_temp: 230.0,
            mold_temp: 55.0,
            injection_pressure: 80.0,
            holding_pressure: 65.0,
            holding_time: 15.0,
            cooling_time: 40.0,
        }
    }

    fn baseline_geometry() -> GeometryParameters {
        GeometryParameters {
            wall_thickness: 2.5,
            part_volume: 100.0,
            aspect_ratio: 1.5,
        }
    }

    fn predictions(warpage: f64, sinkage: f64) -> PredictionResult {
        PredictionResult {
            warpage_percent: warpage,
            sinkage_percent: sinkage,
        }
    }

    #[test]
    fn test_no_rules_on_healthy_process() {
        let result = generate_suggestions(
            &baseline_process(),
            &baseline_geometry(),
            &predictions(1.5, 1.0),
        );
        assert_eq!(result.suggestion_count, 0);
        assert!(result.suggestions.is_empty());
        assert_eq!(result.optimized_parameters, baseline_process());
    }

    #[test]
    fn test_end_to_end_four_rule_scenario() {
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
        let result = generate_suggestions(&process, &geometry, &predictions(8.5, 4.2));

        assert_eq!(result.suggestion_count, 4);

        let s = &result.suggestions;
        assert_eq!(s[0].parameter, AdjustableParameter::MeltTemp);
        assert_eq!(s[0].priority, Priority::High);
        assert_eq!(s[1].parameter, AdjustableParameter::MoldTemp);
        assert_eq!(s[1].priority, Priority::High);
        assert_eq!(s[2].parameter, AdjustableParameter::HoldingTime);
        assert_eq!(s[2].priority, Priority::Medium);
        assert_eq!(s[3].parameter, AdjustableParameter::CoolingTime);
        assert_eq!(s[3].priority, Priority::High);

        let opt = result.optimized_parameters;
        assert_eq!(opt.melt_temp, 225.0);
        assert_eq!(opt.mold_temp, 55.0);
        assert_eq!(opt.holding_time, 15.0);
        assert_eq!(opt.cooling_time, 40.0);
        // Untouched: holding pressure 55 is not < 50, injection pressure 60
        // is not < 60 (and warpage is not < 2 anyway)
        assert_eq!(opt.holding_pressure, 55.0);
        assert_eq!(opt.injection_pressure, 60.0);
    }

    #[test]
    fn test_wall_thickness_boundary_is_strict() {
        let mut geometry = baseline_geometry();

        geometry.wall_thickness = 3.5;
        let result =
            generate_suggestions(&baseline_process(), &geometry, &predictions(1.0, 1.0));
        assert_eq!(result.suggestion_count, 0);

        geometry.wall_thickness = 3.50001;
        let result =
            generate_suggestions(&baseline_process(), &geometry, &predictions(1.0, 1.0));
        assert_eq!(result.suggestion_count, 1);
        assert_eq!(
            result.suggestions[0].parameter,
            AdjustableParameter::WallThickness
        );
        // Advisory only: parameters untouched
        assert_eq!(result.optimized_parameters, baseline_process());
    }

    #[test]
    fn test_melt_temp_rules_are_exclusive() {
        // Hot melt: 1a fires
        let mut process = baseline_process();
        process.melt_temp = 250.0;
        let result =
            generate_suggestions(&process, &baseline_geometry(), &predictions(4.0, 1.0));
        assert_eq!(result.suggestion_count, 1);
        assert_eq!(result.optimized_parameters.melt_temp, 225.0);
        assert_eq!(result.suggestions[0].priority, Priority::High);

        // Cold melt: 1b fires instead
        process.melt_temp = 195.0;
        let result =
            generate_suggestions(&process, &baseline_geometry(), &predictions(4.0, 1.0));
        assert_eq!(result.suggestion_count, 1);
        assert_eq!(result.optimized_parameters.melt_temp, 230.0);
        assert_eq!(result.suggestions[0].priority, Priority::Medium);

        // In-range melt: neither fires even with high warpage
        process.melt_temp = 230.0;
        let result =
            generate_suggestions(&process, &baseline_geometry(), &predictions(4.0, 1.0));
        assert!(result
            .suggestions
            .iter()
            .all(|s| s.parameter != AdjustableParameter::MeltTemp));
    }

    #[test]
    fn test_injection_pressure_needs_low_warpage() {
        let mut process = baseline_process();
        process.injection_pressure = 50.0;

        // High sinkage but also high warpage: rule 6 must not fire
        let result =
            generate_suggestions(&process, &baseline_geometry(), &predictions(3.0, 3.5));
        assert!(result
            .suggestions
            .iter()
            .all(|s| s.parameter != AdjustableParameter::InjectionPressure));

        // Low warpage, high sinkage: rule 6 fires
        let result =
            generate_suggestions(&process, &baseline_geometry(), &predictions(1.0, 3.5));
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.parameter == AdjustableParameter::InjectionPressure));
        assert_eq!(result.optimized_parameters.injection_pressure, 75.0);
    }

    #[test]
    fn test_deterministic_output() {
        let process = baseline_process();
        let geometry = baseline_geometry();
        let preds = predictions(8.5, 4.2);

        let a = generate_suggestions(&process, &geometry, &preds);
        let b = generate_suggestions(&process, &geometry, &preds);
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_pass_no_reevaluation() {
        // Rule 2 raises mold_temp to 55, but rule evaluation keeps using the
        // original parameters: rule outcomes must match what the original
        // inputs dictate, not the intermediate optimized copy.
        let mut process = baseline_process();
        process.mold_temp = 40.0;
        process.holding_pressure = 45.0;

        let result =
            generate_suggestions(&process, &baseline_geometry(), &predictions(1.0, 4.5));
        // Both rule 2 and rule 3 fire off the same original sinkage
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.parameter == AdjustableParameter::MoldTemp));
        assert!(result
            .suggestions
            .iter()
            .any(|s| s.parameter == AdjustableParameter::HoldingPressure));
    }
}
