//! Level controller primitives for HydraFlow.
//!
//! The controller is a discrete PID law evaluated once per tick. It is pure:
//! all memory (integral accumulator, previous error) lives in
//! [`ControllerState`], which the caller threads from one tick to the next.
//!
//! # Architecture
//!
//! - [`PidController`] holds gains, output limits and the [`GainSchedule`]
//!   applied in [`Mode::GainScheduled`]
//! - [`SampleConfig`] carries the validated sample period, so a zero or
//!   negative `dt` is rejected once at startup instead of on every tick
//! - [`Mode`] is the two-way operator switch (`PID` / `MPC` on the wire)

pub mod controller;
pub mod error;
pub mod mode;
pub mod sampled;

pub use controller::{ControllerState, GainSchedule, PidController, PidGains};
pub use error::{ControlError, ControlResult};
pub use mode::Mode;
pub use sampled::SampleConfig;
