//! Closed-loop tank simulation for HydraFlow.
//!
//! Provides:
//! - First-order tank plant with explicit Euler update and zero floor
//! - The control-then-plant tick and a stateful [`LoopDriver`]
//! - Bounded FIFO sample history
//! - Offline fixed-step runner with time-triggered operator commands
//! - Setpoint status classification for displays

pub mod control_loop;
pub mod error;
pub mod history;
pub mod plant;
pub mod sim;
pub mod status;

pub use control_loop::{
    CommandUpdate, LoopCommand, LoopDriver, LoopSample, SampleSink, SinkError, TankLoop,
};
pub use error::{SimError, SimResult};
pub use history::History;
pub use plant::{PlantState, TankPlant};
pub use sim::{CommandSchedule, ScheduledCommand, SimOptions, SimRecord, run_sim};
pub use status::{ControlDirection, SetpointRange, SetpointStatus};
