//! Defect prediction model: training, lifecycle, and inference.
//!
//! `TrainedModelState` bundles the fitted scaler and both defect regressors.
//! It is created by exactly one training run (or loaded from a model store)
//! and is read-only for the rest of the process lifetime, so inference is a
//! pure function safe for unlimited concurrent callers.
//!
//! `QualityPredictor` is the explicit initialize-once handle: concurrent
//! first-time initializers are serialized by a `OnceLock`, guaranteeing the
//! training run happens at most once per process even under racing startup
//! requests.

pub mod dataset;
pub mod mlp;
pub mod scaler;

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::TrainingConfig;
use crate::model_store::{ModelCheckpoint, ModelStore};
use crate::types::{
    feature_vector, first_non_finite, GeometryParameters, PredictionResult, ProcessParameters,
};

pub use mlp::{FitSummary, MlpRegressor};
pub use scaler::ScalerState;

/// Errors surfaced by the prediction path.
#[derive(Debug, Error)]
pub enum PredictorError {
    /// predict() was called before initialize() completed. Fatal to the
    /// calling request; never silently defaulted.
    #[error("model not initialized: call initialize() before predict()")]
    UninitializedModel,
    /// A parameter field was NaN or infinite. Failing fast here keeps NaN
    /// out of the feature pipeline.
    #[error("invalid parameter `{0}`: value is not finite")]
    InvalidParameter(&'static str),
}

/// Provenance and convergence diagnostics for one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Seed the run was driven by
    pub seed: u64,
    /// Synthetic training set size
    pub samples: usize,
    /// Warpage regressor fit outcome
    pub warpage: FitSummary,
    /// Sinkage regressor fit outcome
    pub sinkage: FitSummary,
}

/// Immutable trained model: scaler statistics plus two fitted regressors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModelState {
    /// Standardization statistics fitted on the training set
    pub scaler: ScalerState,
    /// Warpage (%) regressor
    pub warpage_model: MlpRegressor,
    /// Sinkage (%) regressor
    pub sinkage_model: MlpRegressor,
    /// Training run diagnostics
    pub summary: TrainingSummary,
}

impl TrainedModelState {
    /// Run one full training pass: generate the synthetic dataset, fit the
    /// scaler, then fit both regressors on the standardized features.
    ///
    /// Long-running and CPU-bound; belongs on the cold-start or maintenance
    /// path, never per-request. Hitting the epoch cap without convergence is
    /// non-fatal: the best-validation weights are kept and a warning logged.
    #[must_use]
    pub fn train(config: &TrainingConfig) -> Self {
        info!(
            seed = config.seed,
            samples = config.samples,
            max_epochs = config.max_epochs,
            "training defect regressors"
        );

        let data = dataset::generate(config.seed, config.samples);
        let scaler = ScalerState::fit(&data.features);
        let scaled = scaler.transform_all(&data.features);

        let (warpage_model, warpage_fit) = mlp::fit(&scaled, &data.warpage, config, config.seed);
        let (sinkage_model, sinkage_fit) =
            mlp::fit(&scaled, &data.sinkage, config, config.seed.wrapping_add(1));

        for (target, fit) in [("warpage", &warpage_fit), ("sinkage", &sinkage_fit)] {
            if fit.stopped_early {
                info!(
                    target,
                    epochs = fit.epochs_run,
                    val_mse = fit.best_val_mse,
                    "regressor converged (early stop)"
                );
            } else {
                warn!(
                    target,
                    epochs = fit.epochs_run,
                    val_mse = fit.best_val_mse,
                    "regressor hit epoch cap without convergence; using best-validation weights"
                );
            }
        }

        Self {
            scaler,
            warpage_model,
            sinkage_model,
            summary: TrainingSummary {
                seed: config.seed,
                samples: config.samples,
                warpage: warpage_fit,
                sinkage: sinkage_fit,
            },
        }
    }

    /// Predict warpage and sinkage for one parameter set.
    ///
    /// Builds the fixed-order feature vector, standardizes it with the
    /// training-time statistics, runs both regressors, and clamps each
    /// output at zero. Pure: no side effects, no interior mutation.
    pub fn predict(
        &self,
        process: &ProcessParameters,
        geometry: &GeometryParameters,
    ) -> Result<PredictionResult, PredictorError> {
        if let Some(name) = first_non_finite(process, geometry) {
            return Err(PredictorError::InvalidParameter(name));
        }

        let raw = feature_vector(process, geometry);
        let scaled = self.scaler.transform(&raw);

        Ok(PredictionResult {
            warpage_percent: self.warpage_model.predict(&scaled).max(0.0),
            sinkage_percent: self.sinkage_model.predict(&scaled).max(0.0),
        })
    }
}

/// Initialize-once handle to the shared trained model.
#[derive(Debug, Default)]
pub struct QualityPredictor {
    state: OnceLock<Arc<TrainedModelState>>,
}

impl QualityPredictor {
    /// Create an uninitialized predictor handle.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: OnceLock::new(),
        }
    }

    /// Load the model from the store, or fall back to a fresh training run.
    ///
    /// Exactly-once: concurrent callers block on the first initializer and
    /// all receive the same `Arc`. A failed load (missing key, corrupt
    /// payload, version mismatch) is recovered locally by training; the
    /// freshly trained model is then saved back best-effort.
    pub fn initialize(
        &self,
        store: &dyn ModelStore,
        key: &str,
        config: &TrainingConfig,
    ) -> Arc<TrainedModelState> {
        self.state
            .get_or_init(|| match store.load(key) {
                Ok(checkpoint) => {
                    info!(key, version = checkpoint.version, "loaded model checkpoint");
                    Arc::new(checkpoint.state)
                }
                Err(err) => {
                    warn!(key, %err, "model load failed; falling back to training");
                    let state = TrainedModelState::train(config);
                    let checkpoint = ModelCheckpoint::from_state(state.clone());
                    if let Err(save_err) = store.save(key, &checkpoint) {
                        warn!(key, %save_err, "failed to save freshly trained model");
                    }
                    Arc::new(state)
                }
            })
            .clone()
    }

    /// Seed the handle with an already-trained state (tests, maintenance
    /// tools). Returns the shared state, which may be a previously
    /// initialized one if the handle was already set.
    pub fn initialize_with(&self, state: TrainedModelState) -> Arc<TrainedModelState> {
        self.state.get_or_init(|| Arc::new(state)).clone()
    }

    /// Whether initialization has completed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    /// Shared trained state, if initialized.
    #[must_use]
    pub fn state(&self) -> Option<Arc<TrainedModelState>> {
        self.state.get().cloned()
    }

    /// Predict warpage and sinkage for one parameter set.
    pub fn predict(
        &self,
        process: &ProcessParameters,
        geometry: &GeometryParameters,
    ) -> Result<PredictionResult, PredictorError> {
        let state = self.state.get().ok_or(PredictorError::UninitializedModel)?;
        state.predict(process, geometry)
    }
}
