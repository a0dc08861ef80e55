//! Composite quality scoring from predicted defect levels.
//!
//! Warpage and sinkage each contribute 50%. The research reference values
//! are 6.9% optimal warpage and 0.99mm optimal sinkage; note the sinkage
//! reference is quoted in millimeters in the source research while the
//! scoring math below treats sinkage as a percentage. That inconsistency is
//! preserved exactly as observed.

use crate::types::QualityScore;

/// Warpage penalty per percent of warpage (score hits 0 at 10% warpage).
const WARPAGE_PENALTY: f64 = 10.0;

/// Sinkage penalty per percent of sinkage (score hits 0 at 5% sinkage).
const SINKAGE_PENALTY: f64 = 20.0;

/// Overall score at or above which the part meets the production target.
const TARGET_SCORE: f64 = 95.0;

/// Score predicted defect levels on a 0-100 scale.
///
/// Pure and deterministic: no I/O, no state.
#[must_use]
pub fn calculate_quality_score(warpage_percent: f64, sinkage_percent: f64) -> QualityScore {
    let warpage_score = (100.0 - warpage_percent * WARPAGE_PENALTY).max(0.0);
    let sinkage_score = (100.0 - sinkage_percent * SINKAGE_PENALTY).max(0.0);
    let overall_quality = warpage_score * 0.5 + sinkage_score * 0.5;

    QualityScore {
        overall_quality,
        warpage_score,
        sinkage_score,
        meets_target: overall_quality >= TARGET_SCORE,
    }
}
