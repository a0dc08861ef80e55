//! Synthetic training data generation.
//!
//! In a production deployment this would be replaced by measured molding
//! trial data. Samples are drawn uniformly over operating ranges wider than
//! the UI defaults, and the defect targets follow polynomial response
//! surfaces from the underlying molding research plus Gaussian measurement
//! noise. Everything is driven by one seeded RNG, so a (seed, samples) pair
//! fully determines the dataset.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::types::NUM_FEATURES;

/// Sampling ranges for synthetic training data (wider than UI sliders).
mod sample_ranges {
    /// Melt temperature (°C)
    pub const MELT_TEMP: (f64, f64) = (200.0, 260.0);
    /// Mold temperature (°C)
    pub const MOLD_TEMP: (f64, f64) = (30.0, 80.0);
    /// Injection pressure (MPa)
    pub const INJECTION_PRESSURE: (f64, f64) = (30.0, 120.0);
    /// Holding pressure (MPa)
    pub const HOLDING_PRESSURE: (f64, f64) = (20.0, 80.0);
    /// Holding time (s)
    pub const HOLDING_TIME: (f64, f64) = (5.0, 30.0);
    /// Cooling time (s)
    pub const COOLING_TIME: (f64, f64) = (10.0, 60.0);
    /// Wall thickness (mm)
    pub const WALL_THICKNESS: (f64, f64) = (1.5, 4.0);
    /// Part volume (cm³)
    pub const PART_VOLUME: (f64, f64) = (20.0, 200.0);
    /// Aspect ratio (unitless)
    pub const ASPECT_RATIO: (f64, f64) = (0.5, 3.0);
}

/// Measurement noise sigma for warpage targets (%).
const WARPAGE_NOISE_SIGMA: f64 = 0.5;

/// Measurement noise sigma for sinkage targets (%).
const SINKAGE_NOISE_SIGMA: f64 = 0.4;

/// Physically plausible warpage bounds (%) for clipping.
const WARPAGE_BOUNDS: (f64, f64) = (0.5, 15.0);

/// Physically plausible sinkage bounds (%) for clipping.
const SINKAGE_BOUNDS: (f64, f64) = (0.3, 12.0);

/// One generated training set: raw feature rows and both target vectors.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    /// Raw (unscaled) feature rows in the fixed model order
    pub features: Vec<[f64; NUM_FEATURES]>,
    /// Warpage targets (%)
    pub warpage: Vec<f64>,
    /// Sinkage targets (%)
    pub sinkage: Vec<f64>,
}

/// Warpage response surface (noise-free part).
///
/// Feature indices follow [`crate::types::FEATURE_NAMES`].
fn warpage_response(x: &[f64; NUM_FEATURES]) -> f64 {
    let melt_temp = x[0];
    let mold_temp = x[1];
    let cooling_time = x[5];
    let wall_thickness = x[6];
    let aspect_ratio = x[8];

    0.15 * (melt_temp - 230.0).powi(2) / 1000.0
        + 0.10 * (mold_temp - 50.0).powi(2) / 100.0
        + 0.05 * (cooling_time - 30.0) / 20.0
        + 0.12 * wall_thickness
        + 0.08 * aspect_ratio
}

/// Sinkage response surface (noise-free part).
fn sinkage_response(x: &[f64; NUM_FEATURES]) -> f64 {
    let mold_temp = x[1];
    let holding_pressure = x[3];
    let holding_time = x[4];
    let wall_thickness = x[6];

    0.20 * (holding_pressure - 50.0).powi(2) / 1000.0
        + 0.18 * (holding_time - 15.0) / 10.0
        + 0.15 * wall_thickness.powi(2) / 5.0
        + 0.12 * (mold_temp - 50.0) / 30.0
}

/// Generate `samples` training rows with the given seed.
#[must_use]
pub fn generate(seed: u64, samples: usize) -> SyntheticDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    // Sigmas are compile-time positive constants, so construction cannot fail
    let warpage_noise = Normal::new(0.0, WARPAGE_NOISE_SIGMA)
        .unwrap_or_else(|_| unreachable!("sigma is a positive constant"));
    let sinkage_noise = Normal::new(0.0, SINKAGE_NOISE_SIGMA)
        .unwrap_or_else(|_| unreachable!("sigma is a positive constant"));

    let mut features = Vec::with_capacity(samples);
    let mut warpage = Vec::with_capacity(samples);
    let mut sinkage = Vec::with_capacity(samples);

    for _ in 0..samples {
        let row: [f64; NUM_FEATURES] = [
            rng.gen_range(sample_ranges::MELT_TEMP.0..sample_ranges::MELT_TEMP.1),
            rng.gen_range(sample_ranges::MOLD_TEMP.0..sample_ranges::MOLD_TEMP.1),
            rng.gen_range(
                sample_ranges::INJECTION_PRESSURE.0..sample_ranges::INJECTION_PRESSURE.1,
            ),
            rng.gen_range(sample_ranges::HOLDING_PRESSURE.0..sample_ranges::HOLDING_PRESSURE.1),
            rng.gen_range(sample_ranges::HOLDING_TIME.0..sample_ranges::HOLDING_TIME.1),
            rng.gen_range(sample_ranges::COOLING_TIME.0..sample_ranges::COOLING_TIME.1),
            rng.gen_range(sample_ranges::WALL_THICKNESS.0..sample_ranges::WALL_THICKNESS.1),
            rng.gen_range(sample_ranges::PART_VOLUME.0..sample_ranges::PART_VOLUME.1),
            rng.gen_range(sample_ranges::ASPECT_RATIO.0..sample_ranges::ASPECT_RATIO.1),
        ];

        let w = (warpage_response(&row) + warpage_noise.sample(&mut rng))
            .clamp(WARPAGE_BOUNDS.0, WARPAGE_BOUNDS.1);
        let s = (sinkage_response(&row) + sinkage_noise.sample(&mut rng))
            .clamp(SINKAGE_BOUNDS.0, SINKAGE_BOUNDS.1);

        features.push(row);
        warpage.push(w);
        sinkage.push(s);
    }

    SyntheticDataset {
        features,
        warpage,
        sinkage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_seeded() {
        let a = generate(42, 50);
        let b = generate(42, 50);
        assert_eq!(a.features, b.features);
        assert_eq!(a.warpage, b.warpage);
        assert_eq!(a.sinkage, b.sinkage);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate(42, 50);
        let b = generate(43, 50);
        assert_ne!(a.features, b.features);
    }

    #[test]
    fn test_targets_clipped_to_bounds() {
        let data = generate(42, 500);
        assert_eq!(data.features.len(), 500);
        for &w in &data.warpage {
            assert!((WARPAGE_BOUNDS.0..=WARPAGE_BOUNDS.1).contains(&w));
        }
        for &s in &data.sinkage {
            assert!((SINKAGE_BOUNDS.0..=SINKAGE_BOUNDS.1).contains(&s));
        }
    }

    #[test]
    fn test_features_inside_sampling_ranges() {
        let data = generate(7, 200);
        for row in &data.features {
            assert!(row[0] >= sample_ranges::MELT_TEMP.0 && row[0] < sample_ranges::MELT_TEMP.1);
            assert!(
                row[6] >= sample_ranges::WALL_THICKNESS.0
                    && row[6] < sample_ranges::WALL_THICKNESS.1
            );
            assert!(
                row[8] >= sample_ranges::ASPECT_RATIO.0 && row[8] < sample_ranges::ASPECT_RATIO.1
            );
        }
    }

    #[test]
    fn test_thicker_walls_warp_more_on_average() {
        // The response surface has a positive wall-thickness term; verify the
        // generated targets reflect it (averages over many samples).
        let data = generate(42, 500);
        let (mut thin_sum, mut thin_n, mut thick_sum, mut thick_n) = (0.0, 0, 0.0, 0);
        for (row, &w) in data.features.iter().zip(&data.warpage) {
            if row[6] < 2.0 {
                thin_sum += w;
                thin_n += 1;
            } else if row[6] > 3.5 {
                thick_sum += w;
                thick_n += 1;
            }
        }
        assert!(thin_n > 10 && thick_n > 10);
        assert!(thick_sum / f64::from(thick_n) > thin_sum / f64::from(thin_n));
    }
}
