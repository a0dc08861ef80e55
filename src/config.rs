//! Training configuration with compiled defaults and an optional TOML overlay.
//!
//! The seed is an explicit field rather than a hidden module constant:
//! reproducibility of the synthetic dataset and of weight initialization is
//! part of the training contract, so the caller always sees which seed was
//! used.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default pseudo-random seed for synthetic data and weight initialization.
pub const DEFAULT_SEED: u64 = 42;

/// Default synthetic training set size.
pub const DEFAULT_SAMPLES: usize = 500;

/// Default maximum training epochs per regressor.
pub const DEFAULT_MAX_EPOCHS: usize = 500;

/// Default fraction of samples held out for early-stopping validation.
pub const DEFAULT_VALIDATION_FRACTION: f64 = 0.1;

/// Errors raised while loading a config overlay file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Hyperparameters and dataset settings for one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Pseudo-random seed (dataset sampling, noise, weight init, shuffling)
    pub seed: u64,
    /// Number of synthetic training samples to generate
    pub samples: usize,
    /// Maximum training epochs per regressor
    pub max_epochs: usize,
    /// Fraction of samples held out for validation (0 < f < 1)
    pub validation_fraction: f64,
    /// Adam base learning rate
    pub learning_rate: f64,
    /// Mini-batch size
    pub batch_size: usize,
    /// Epochs without validation improvement before early stop
    pub patience: usize,
    /// Minimum validation MSE improvement to reset the patience counter
    pub tol: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            samples: DEFAULT_SAMPLES,
            max_epochs: DEFAULT_MAX_EPOCHS,
            validation_fraction: DEFAULT_VALIDATION_FRACTION,
            learning_rate: 0.001,
            batch_size: 32,
            patience: 10,
            tol: 1e-4,
        }
    }
}

impl TrainingConfig {
    /// Load a config overlay from a TOML file. Missing keys fall back to
    /// defaults via `#[serde(default)]`.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Sanity-check field ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples < 20 {
            return Err(ConfigError::Invalid(format!(
                "samples must be >= 20, got {}",
                self.samples
            )));
        }
        if self.max_epochs == 0 {
            return Err(ConfigError::Invalid("max_epochs must be > 0".to_string()));
        }
        if !(self.validation_fraction > 0.0 && self.validation_fraction < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "validation_fraction must be in (0, 1), got {}",
                self.validation_fraction
            )));
        }
        if self.learning_rate <= 0.0 || !self.learning_rate.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "learning_rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TrainingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, 42);
        assert_eq!(config.samples, 500);
        assert_eq!(config.max_epochs, 500);
        assert!((config.validation_fraction - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_partial_toml_overlay() {
        let config: TrainingConfig =
            toml::from_str("seed = 7\nsamples = 200").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.samples, 200);
        // Unspecified keys keep defaults
        assert_eq!(config.max_epochs, DEFAULT_MAX_EPOCHS);
    }

    #[test]
    fn test_validate_rejects_bad_fraction() {
        let config = TrainingConfig {
            validation_fraction: 1.0,
            ..TrainingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_tiny_dataset() {
        let config = TrainingConfig {
            samples: 5,
            ..TrainingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
