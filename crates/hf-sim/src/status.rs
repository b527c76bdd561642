//! Operator-facing interpretation of the loop state.

use serde::{Deserialize, Serialize};

/// Documented setpoint range. Informational only; setpoints outside it are
/// still applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetpointRange {
    pub min: f64,
    pub max: f64,
}

impl Default for SetpointRange {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 24.0,
        }
    }
}

impl SetpointRange {
    pub fn contains(&self, setpoint: f64) -> bool {
        (self.min..=self.max).contains(&setpoint)
    }
}

/// Band for "close but not there yet".
pub const NEAR_SETPOINT_BAND: f64 = 2.0;

/// How far the level is from the setpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetpointStatus {
    AtSetpoint,
    NearSetpoint,
    OutOfRange,
}

impl SetpointStatus {
    /// Classify the absolute tracking error against `tolerance` and
    /// [`NEAR_SETPOINT_BAND`].
    pub fn classify(level: f64, setpoint: f64, tolerance: f64) -> Self {
        let error = (level - setpoint).abs();
        if error <= tolerance {
            Self::AtSetpoint
        } else if error <= NEAR_SETPOINT_BAND {
            Self::NearSetpoint
        } else {
            Self::OutOfRange
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AtSetpoint => "AT SETPOINT",
            Self::NearSetpoint => "NEAR SETPOINT",
            Self::OutOfRange => "OUT OF RANGE",
        }
    }
}

/// Sign of the actuator command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlDirection {
    Filling,
    Draining,
    Neutral,
}

impl ControlDirection {
    pub fn of(control: f64) -> Self {
        if control > 0.0 {
            Self::Filling
        } else if control < 0.0 {
            Self::Draining
        } else {
            Self::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Filling => "Filling",
            Self::Draining => "Draining",
            Self::Neutral => "Neutral",
        }
    }
}
