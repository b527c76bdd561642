//! One tick of the closed loop, and the driver that threads state through it.
//!
//! Each tick computes the control from the level measured *before* the plant
//! update, then advances the plant with that control. The resulting sample
//! therefore pairs the new level with the control that produced it.

use hf_controls::{ControllerState, Mode, PidController, SampleConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::History;
use crate::plant::{PlantState, TankPlant};
use crate::status::SetpointRange;

/// Operator inputs consumed by every tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoopCommand {
    pub setpoint: f64,
    pub mode: Mode,
}

impl LoopCommand {
    pub fn new(setpoint: f64, mode: Mode) -> Self {
        Self { setpoint, mode }
    }

    /// Copy with a single field replaced.
    pub fn with(self, update: CommandUpdate) -> Self {
        match update {
            CommandUpdate::Setpoint(setpoint) => Self { setpoint, ..self },
            CommandUpdate::Mode(mode) => Self { mode, ..self },
        }
    }
}

/// A single operator change, as carried by one inbound message.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CommandUpdate {
    Setpoint(f64),
    Mode(Mode),
}

/// One recorded tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoopSample {
    /// Seconds since loop start.
    pub time: f64,
    /// Level after this tick's plant update.
    pub level: f64,
    /// Control applied during this tick.
    pub control: f64,
}

/// Controller + plant + period: everything a tick needs besides state.
#[derive(Clone, Debug, PartialEq)]
pub struct TankLoop {
    pub controller: PidController,
    pub plant: TankPlant,
    pub sample: SampleConfig,
}

impl TankLoop {
    pub fn new(controller: PidController, plant: TankPlant, sample: SampleConfig) -> Self {
        Self {
            controller,
            plant,
            sample,
        }
    }

    /// Run one control-then-plant tick.
    pub fn tick(
        &self,
        command: &LoopCommand,
        time: f64,
        controller: &ControllerState,
        plant: &PlantState,
    ) -> (LoopSample, ControllerState, PlantState) {
        let (next_controller, control) = self.controller.compute(
            controller,
            command.setpoint,
            plant.level,
            command.mode,
            self.sample,
        );
        let next_plant = self.plant.advance(plant, control, self.sample);

        let sample = LoopSample {
            time,
            level: next_plant.level,
            control,
        };
        (sample, next_controller, next_plant)
    }
}

/// Stateful wrapper that owns the loop memory between ticks.
#[derive(Clone, Debug)]
pub struct LoopDriver {
    tank_loop: TankLoop,
    command: LoopCommand,
    controller: ControllerState,
    plant: PlantState,
    history: Option<History>,
    setpoint_range: SetpointRange,
}

impl LoopDriver {
    /// Driver starting from rest (zero integral and previous error).
    pub fn new(tank_loop: TankLoop, initial: PlantState, command: LoopCommand) -> Self {
        Self {
            tank_loop,
            command,
            controller: ControllerState::default(),
            plant: initial,
            history: None,
            setpoint_range: SetpointRange::default(),
        }
    }

    /// Record every tick into `history`.
    pub fn with_history(mut self, history: History) -> Self {
        self.history = Some(history);
        self
    }

    /// Detach the history, leaving the driver unrecorded.
    pub fn take_history(&mut self) -> Option<History> {
        self.history.take()
    }

    pub fn with_setpoint_range(mut self, range: SetpointRange) -> Self {
        self.setpoint_range = range;
        self
    }

    /// Apply one operator change. Out-of-range setpoints are accepted and
    /// only reported.
    pub fn apply(&mut self, update: CommandUpdate) {
        let next = self.command.with(update);
        if next == self.command {
            return;
        }
        match update {
            CommandUpdate::Setpoint(sp) => {
                if !self.setpoint_range.contains(sp) {
                    tracing::warn!(
                        setpoint = sp,
                        min = self.setpoint_range.min,
                        max = self.setpoint_range.max,
                        "setpoint outside documented range"
                    );
                }
                tracing::info!(setpoint = sp, "setpoint changed");
            }
            CommandUpdate::Mode(mode) => tracing::info!(%mode, "control mode changed"),
        }
        self.command = next;
    }

    /// Replace the whole command, logging each changed field.
    pub fn set_command(&mut self, command: LoopCommand) {
        if command.setpoint != self.command.setpoint {
            self.apply(CommandUpdate::Setpoint(command.setpoint));
        }
        if command.mode != self.command.mode {
            self.apply(CommandUpdate::Mode(command.mode));
        }
    }

    /// Run one tick stamped with `time` and record it.
    pub fn step(&mut self, time: f64) -> LoopSample {
        let (sample, controller, plant) =
            self.tank_loop
                .tick(&self.command, time, &self.controller, &self.plant);
        self.controller = controller;
        self.plant = plant;
        if let Some(history) = self.history.as_mut() {
            history.push(sample);
        }
        sample
    }

    pub fn command(&self) -> LoopCommand {
        self.command
    }

    pub fn level(&self) -> f64 {
        self.plant.level
    }

    pub fn controller_state(&self) -> ControllerState {
        self.controller
    }

    pub fn plant_state(&self) -> PlantState {
        self.plant
    }

    pub fn sample(&self) -> SampleConfig {
        self.tank_loop.sample
    }

    pub fn setpoint_range(&self) -> SetpointRange {
        self.setpoint_range
    }

    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }
}

/// Failure to hand a sample downstream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    #[error("Sample buffer full; oldest sample dropped")]
    Overflow,

    #[error("Transport error: {message}")]
    Transport { message: String },
}

/// Downstream consumer of every tick (display, network peer, ...).
///
/// Errors are reported to the caller, which decides whether the loop keeps
/// running; the loop itself never depends on a sink succeeding.
pub trait SampleSink {
    fn publish(&mut self, sample: &LoopSample, command: &LoopCommand) -> Result<(), SinkError>;
}
