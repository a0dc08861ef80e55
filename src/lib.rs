//! MoldIQ: Injection-Molding Quality Intelligence
//!
//! Predicts warpage and sinkage for injection-molded parts from process and
//! geometry parameters, scores overall quality, and proposes parameter
//! adjustments.
//!
//! ## Architecture
//!
//! - **Predictor**: feature vectorization, standardization, MLP regression
//!   (training and inference) behind an initialize-once handle
//! - **Model Store**: versioned checkpoint persistence behind a trait
//! - **Optimization**: pure quality scoring + 7-rule suggestion engine

pub mod config;
pub mod model_store;
pub mod optimization;
pub mod predictor;
pub mod types;

// Re-export configuration
pub use config::TrainingConfig;

// Re-export commonly used types
pub use types::{
    AdjustableParameter, GeometryParameters, OptimizationResult, PredictionResult, Priority,
    ProcessParameters, QualityRating, QualityScore, Suggestion,
};

// Re-export the predictor surface
pub use predictor::{PredictorError, QualityPredictor, TrainedModelState, TrainingSummary};

// Re-export model storage
pub use model_store::{ModelCheckpoint, ModelStore, ModelStoreError, SledModelStore};

// Re-export optimization components
pub use optimization::{
    calculate_quality_score, generate_suggestions, OptimizationOutcome, ProcessOptimizer,
};
