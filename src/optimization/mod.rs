//! Quality scoring and rule-based parameter optimization.

mod optimizer;
mod rules;
mod scoring;

pub use optimizer::{optimal_ranges, OptimizationOutcome, ProcessOptimizer};
pub use rules::generate_suggestions;
pub use scoring::calculate_quality_score;
