//! Suggestion engine output types for process parameter optimization.

use serde::{Deserialize, Serialize};

use super::params::ProcessParameters;

/// Parameters a suggestion can target.
///
/// `WallThickness` is a geometry property, not a machine setting — the rule
/// engine can flag it but never rewrites it in the optimized parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustableParameter {
    /// Melt temperature (°C)
    MeltTemp,
    /// Mold temperature (°C)
    MoldTemp,
    /// Injection pressure (MPa)
    InjectionPressure,
    /// Holding pressure (MPa)
    HoldingPressure,
    /// Holding time (s)
    HoldingTime,
    /// Cooling time (s)
    CoolingTime,
    /// Wall thickness (mm) — advisory only
    WallThickness,
}

impl AdjustableParameter {
    /// Engineering unit for display.
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            Self::MeltTemp | Self::MoldTemp => "°C",
            Self::InjectionPressure | Self::HoldingPressure => "MPa",
            Self::HoldingTime | Self::CoolingTime => "s",
            Self::WallThickness => "mm",
        }
    }
}

impl std::fmt::Display for AdjustableParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MeltTemp => write!(f, "Melt Temperature"),
            Self::MoldTemp => write!(f, "Mold Temperature"),
            Self::InjectionPressure => write!(f, "Injection Pressure"),
            Self::HoldingPressure => write!(f, "Holding Pressure"),
            Self::HoldingTime => write!(f, "Holding Time"),
            Self::CoolingTime => write!(f, "Cooling Time"),
            Self::WallThickness => write!(f, "Wall Thickness"),
        }
    }
}

/// Suggestion priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
        }
    }
}

/// One actionable parameter adjustment produced by the rule engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Which parameter to adjust
    pub parameter: AdjustableParameter,
    /// What defect or condition triggered the suggestion
    pub issue: String,
    /// Current parameter value
    pub current: f64,
    /// Suggested target value
    pub suggested: f64,
    /// Expected effect of the change
    pub impact: String,
    /// Suggestion priority
    pub priority: Priority,
}

/// Full rule-engine output for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Suggestions in fixed rule order
    pub suggestions: Vec<Suggestion>,
    /// Working copy of the process parameters with suggested values applied
    pub optimized_parameters: ProcessParameters,
    /// Number of triggered rules (0-7)
    pub suggestion_count: usize,
}
