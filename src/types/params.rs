//! Process and geometry parameter types plus fixed-order feature vectorization.
//!
//! The feature order defined here is a hard invariant: the scaler statistics
//! and the regressor weights are fitted against this exact ordering, so it
//! must be identical at training and inference time.

use serde::{Deserialize, Serialize};

/// Number of model input features (6 process + 3 geometry).
pub const NUM_FEATURES: usize = 9;

/// Feature names, matching the order produced by [`feature_vector`].
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "melt_temp",
    "mold_temp",
    "injection_pressure",
    "holding_pressure",
    "holding_time",
    "cooling_time",
    "wall_thickness",
    "part_volume",
    "aspect_ratio",
];

/// Documented input domains for each parameter.
///
/// These bounds are for UI sliders and operator documentation only.
/// The core accepts any finite value and does not enforce them.
pub mod param_ranges {
    /// Melt temperature (°C)
    pub const MELT_TEMP: (f64, f64) = (180.0, 280.0);
    /// Mold temperature (°C)
    pub const MOLD_TEMP: (f64, f64) = (20.0, 100.0);
    /// Injection pressure (MPa)
    pub const INJECTION_PRESSURE: (f64, f64) = (20.0, 150.0);
    /// Holding pressure (MPa)
    pub const HOLDING_PRESSURE: (f64, f64) = (10.0, 100.0);
    /// Holding time (s)
    pub const HOLDING_TIME: (f64, f64) = (2.0, 60.0);
    /// Cooling time (s)
    pub const COOLING_TIME: (f64, f64) = (5.0, 120.0);
    /// Wall thickness (mm)
    pub const WALL_THICKNESS: (f64, f64) = (0.5, 5.0);
    /// Part volume (cm³)
    pub const PART_VOLUME: (f64, f64) = (10.0, 300.0);
    /// Aspect ratio (length/width, unitless)
    pub const ASPECT_RATIO: (f64, f64) = (0.5, 4.0);
}

/// Machine-side process parameters for one molding cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessParameters {
    /// Melt temperature (°C)
    pub melt_temp: f64,
    /// Mold surface temperature (°C)
    pub mold_temp: f64,
    /// Injection pressure (MPa)
    pub injection_pressure: f64,
    /// Packing-phase holding pressure (MPa)
    pub holding_pressure: f64,
    /// Packing-phase holding time (s)
    pub holding_time: f64,
    /// In-mold cooling time (s)
    pub cooling_time: f64,
}

/// Part geometry parameters. Fixed per part design, not machine-settable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryParameters {
    /// Nominal wall thickness (mm)
    pub wall_thickness: f64,
    /// Part volume (cm³)
    pub part_volume: f64,
    /// Length/width aspect ratio (unitless)
    pub aspect_ratio: f64,
}

/// Build the fixed-order model feature vector from process + geometry.
///
/// Order matches [`FEATURE_NAMES`].
#[must_use]
pub fn feature_vector(
    process: &ProcessParameters,
    geometry: &GeometryParameters,
) -> [f64; NUM_FEATURES] {
    [
        process.melt_temp,
        process.mold_temp,
        process.injection_pressure,
        process.holding_pressure,
        process.holding_time,
        process.cooling_time,
        geometry.wall_thickness,
        geometry.part_volume,
        geometry.aspect_ratio,
    ]
}

/// Return the name of the first non-finite field, if any.
///
/// Used to fail fast with a named parameter instead of letting NaN propagate
/// through the feature pipeline.
#[must_use]
pub fn first_non_finite(
    process: &ProcessParameters,
    geometry: &GeometryParameters,
) -> Option<&'static str> {
    let values = feature_vector(process, geometry);
    values
        .iter()
        .zip(FEATURE_NAMES.iter())
        .find(|(v, _)| !v.is_finite())
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> (ProcessParameters, GeometryParameters) {
        (
            ProcessParameters {
                melt_temp: 230.0,
                mold_temp: 50.0,
                injection_pressure: 80.0,
                holding_pressure: 60.0,
                holding_time: 15.0,
                cooling_time: 30.0,
            },
            GeometryParameters {
                wall_thickness: 2.5,
                part_volume: 100.0,
                aspect_ratio: 1.5,
            },
        )
    }

    #[test]
    fn test_feature_vector_order() {
        let (p, g) = sample_params();
        let v = feature_vector(&p, &g);
        assert_eq!(v[0], 230.0); // melt_temp first
        assert_eq!(v[5], 30.0); // cooling_time last process param
        assert_eq!(v[6], 2.5); // geometry starts at index 6
        assert_eq!(v[8], 1.5); // aspect_ratio last
    }

    #[test]
    fn test_first_non_finite_names_field() {
        let (mut p, g) = sample_params();
        assert_eq!(first_non_finite(&p, &g), None);

        p.holding_time = f64::NAN;
        assert_eq!(first_non_finite(&p, &g), Some("holding_time"));
    }

    #[test]
    fn test_feature_names_match_count() {
        assert_eq!(FEATURE_NAMES.len(), NUM_FEATURES);
    }
}
