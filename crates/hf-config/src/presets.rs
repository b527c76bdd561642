//! Built-in parameter sets.

use std::fmt;
use std::str::FromStr;

use hf_controls::{GainSchedule, Mode};

use crate::schema::{ControllerDef, DisplayDef, InitialDef, LinkDef, LoopConfig, PlantDef};
use crate::validate::LATEST_VERSION;
use crate::ConfigError;

/// The two shipped tunings of the same loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Operator display: discharge-form plant, 200-sample history.
    #[default]
    Display,
    /// Headless UDP simulator: time-constant plant, no history.
    Network,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Display, Preset::Network];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Display => "display",
            Preset::Network => "network",
        }
    }

    pub fn config(self) -> LoopConfig {
        match self {
            Preset::Display => LoopConfig {
                version: LATEST_VERSION,
                name: "Tank level (display)".to_string(),
                dt: 0.1,
                initial: InitialDef {
                    level: 5.0,
                    setpoint: 5.0,
                    mode: Mode::Pid,
                },
                controller: ControllerDef {
                    kp: 1.8,
                    ki: 0.15,
                    kd: 0.6,
                    out_min: -10.0,
                    out_max: 10.0,
                    schedule: GainSchedule::default(),
                },
                plant: PlantDef::Discharge {
                    k_u: 0.8,
                    k_d: 0.15,
                },
                history_capacity: Some(200),
                display: DisplayDef::default(),
                link: LinkDef::default(),
            },
            Preset::Network => LoopConfig {
                version: LATEST_VERSION,
                name: "Tank level (network)".to_string(),
                dt: 0.1,
                initial: InitialDef {
                    level: 5.0,
                    setpoint: 10.0,
                    mode: Mode::Pid,
                },
                controller: ControllerDef {
                    kp: 2.0,
                    ki: 0.4,
                    kd: 0.2,
                    out_min: -10.0,
                    out_max: 10.0,
                    schedule: GainSchedule::default(),
                },
                plant: PlantDef::TimeConstant { tau: 4.0, k: 0.8 },
                history_capacity: None,
                display: DisplayDef::default(),
                link: LinkDef::default(),
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownPreset {
                name: s.to_string(),
            })
    }
}
