//! Operator-selectable control mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// Which control law drives the tank.
///
/// The wire and display labels are `PID` and `MPC`; the latter is the
/// historical name for the gain-scheduled variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Plain PID output.
    #[default]
    #[serde(rename = "PID")]
    Pid,
    /// PID with the configured [`GainSchedule`](crate::GainSchedule) applied.
    #[serde(rename = "MPC", alias = "GAIN_SCHEDULED")]
    GainScheduled,
}

impl Mode {
    /// Label used on the wire and in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Pid => "PID",
            Mode::GainScheduled => "MPC",
        }
    }

    /// Human readable description for the operator panel.
    pub fn description(self) -> &'static str {
        match self {
            Mode::Pid => "PID",
            Mode::GainScheduled => "PID + Gain Scheduling",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        match token.to_ascii_uppercase().as_str() {
            "PID" => Ok(Mode::Pid),
            "MPC" | "GS" | "GAIN_SCHEDULED" => Ok(Mode::GainScheduled),
            _ => Err(ControlError::UnknownMode {
                token: token.to_string(),
            }),
        }
    }
}
