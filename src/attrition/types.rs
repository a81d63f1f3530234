use serde::{Deserialize, Serialize};
use std::f64::consts::E;
use std::fmt;

/// Losses the reference step inflicts, relative to the step factor's denominator.
pub const STEP_REFERENCE_LOSS: f64 = 100.0;

/// The closed set of attrition laws under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttritionLaw {
    Linear,
    Squared,
    Logarithmic,
    TimeDecay,
}

impl AttritionLaw {
    pub const ALL: [AttritionLaw; 4] = [
        AttritionLaw::Linear,
        AttritionLaw::Squared,
        AttritionLaw::Logarithmic,
        AttritionLaw::TimeDecay,
    ];

    /// Law for a model index in `0..=3`.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        match self {
            AttritionLaw::Linear => 0,
            AttritionLaw::Squared => 1,
            AttritionLaw::Logarithmic => 2,
            AttritionLaw::TimeDecay => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AttritionLaw::Linear => "linear",
            AttritionLaw::Squared => "squared",
            AttritionLaw::Logarithmic => "logarithmic",
            AttritionLaw::TimeDecay => "time decay",
        }
    }

    /// Blue-on-red step factor `bPow`.
    ///
    /// Normalises the first step to `STEP_REFERENCE_LOSS` units against
    /// `R0·B0` for the linear law and `max(R0, B0)` for the others. Both
    /// strengths must be positive.
    pub fn step_factor(self, red_initial: u32, blue_initial: u32) -> f64 {
        let denominator = match self {
            AttritionLaw::Linear => red_initial as f64 * blue_initial as f64,
            _ => red_initial.max(blue_initial) as f64,
        };
        STEP_REFERENCE_LOSS / denominator
    }

    /// Losses `(red, blue)` for one step from strengths `(red, blue)`.
    ///
    /// `blue_power` scales losses inflicted on red, `red_power` those
    /// inflicted on blue.
    pub fn losses(
        self,
        red: f64,
        blue: f64,
        step: usize,
        blue_power: f64,
        red_power: f64,
    ) -> (f64, f64) {
        match self {
            AttritionLaw::Linear => (blue_power * blue * red, red_power * red * blue),
            AttritionLaw::Squared => (blue_power * blue, red_power * red),
            AttritionLaw::Logarithmic => (blue_power * red, red_power * blue),
            AttritionLaw::TimeDecay => {
                let decay = (E + step as f64).ln();
                (blue_power * red / decay, red_power * blue / decay)
            }
        }
    }
}

impl fmt::Display for AttritionLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Simulated casualties for one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasualtyPair {
    pub red: u32,
    pub blue: u32,
}

/// Remaining strengths after one simulated step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttritionStep {
    pub step: usize,
    pub red: u32,
    pub blue: u32,
}

/// Full step-by-step record of one simulated battle.
#[derive(Debug, Clone, PartialEq)]
pub struct AttritionTrace {
    pub law: AttritionLaw,
    pub pow_ratio: f64,
    pub step_factor: f64,
    /// Index 0 holds the initial strengths.
    pub steps: Vec<AttritionStep>,
    pub casualties: CasualtyPair,
}

impl AttritionTrace {
    /// Number of update steps taken before the loop halted.
    pub fn num_steps(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}
