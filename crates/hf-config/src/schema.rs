//! Loop configuration schema.

use hf_controls::{GainSchedule, Mode};
use hf_link::{DEFAULT_COMMAND_ADDR, DEFAULT_TELEMETRY_ADDR};
use hf_sim::SetpointRange;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoopConfig {
    pub version: u32,
    pub name: String,
    /// Sample period in seconds.
    pub dt: f64,
    pub initial: InitialDef,
    pub controller: ControllerDef,
    pub plant: PlantDef,
    /// Samples kept for display; `None` disables history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_capacity: Option<usize>,
    #[serde(default)]
    pub display: DisplayDef,
    #[serde(default)]
    pub link: LinkDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitialDef {
    pub level: f64,
    pub setpoint: f64,
    #[serde(default)]
    pub mode: Mode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControllerDef {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    #[serde(default = "default_out_min")]
    pub out_min: f64,
    #[serde(default = "default_out_max")]
    pub out_max: f64,
    #[serde(default)]
    pub schedule: GainSchedule,
}

fn default_out_min() -> f64 {
    -10.0
}

fn default_out_max() -> f64 {
    10.0
}

/// Tank dynamics, in either of its two equivalent parameterizations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlantDef {
    /// `dL/dt = k_u * u - k_d * L`
    Discharge { k_u: f64, k_d: f64 },
    /// `dL/dt = -L / tau + k * u`
    TimeConstant { tau: f64, k: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayDef {
    #[serde(default)]
    pub setpoint_range: SetpointRange,
    /// Error at or below which the level counts as "at setpoint".
    #[serde(default = "default_tolerance")]
    pub setpoint_tolerance: f64,
}

fn default_tolerance() -> f64 {
    0.5
}

impl Default for DisplayDef {
    fn default() -> Self {
        Self {
            setpoint_range: SetpointRange::default(),
            setpoint_tolerance: default_tolerance(),
        }
    }
}

/// UDP endpoints used by the networked simulator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkDef {
    /// Address the simulator receives commands on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Address telemetry is sent to.
    #[serde(default = "default_peer")]
    pub peer: String,
}

fn default_bind() -> String {
    DEFAULT_COMMAND_ADDR.to_string()
}

fn default_peer() -> String {
    DEFAULT_TELEMETRY_ADDR.to_string()
}

impl Default for LinkDef {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            peer: default_peer(),
        }
    }
}
