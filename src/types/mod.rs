//! Shared data structures for the molding quality intelligence core
//!
//! This module defines the types flowing through the pipeline:
//! - `params`: ProcessParameters, GeometryParameters, feature vectorization
//! - `prediction`: PredictionResult, QualityScore, QualityRating
//! - `optimization`: Suggestion, OptimizationResult (rule engine outputs)

mod optimization;
mod params;
mod prediction;

pub use optimization::*;
pub use params::*;
pub use prediction::*;
