//! Tank level controller.
//!
//! Discrete PID law in parallel form:
//!
//! ```text
//! e[n]   = sp - pv
//! I[n]   = I[n-1] + e[n] * dt
//! D[n]   = (e[n] - e[n-1]) / dt
//! u[n]   = clamp(Kp*e + Ki*I + Kd*D, out_min, out_max)
//! ```
//!
//! There is no anti-windup beyond the output clamp: the integral keeps
//! accumulating while the output is saturated.

use hf_core::ensure_finite;
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};
use crate::mode::Mode;
use crate::sampled::SampleConfig;

/// Parallel-form PID gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain (per second).
    pub ki: f64,
    /// Derivative gain (seconds).
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    fn validate(&self) -> ControlResult<()> {
        ensure_finite(self.kp, "kp")?;
        ensure_finite(self.ki, "ki")?;
        ensure_finite(self.kd, "kd")?;
        Ok(())
    }
}

/// Output shaping applied when the loop runs in [`Mode::GainScheduled`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GainSchedule {
    /// Scale the PID output by `factor` while `|error| < band`.
    NearSetpointDamping {
        /// Error magnitude below which damping applies.
        band: f64,
        /// Multiplier applied to the saturated PID output.
        factor: f64,
    },
    /// Replace the output with `kp * error`. The PID state still advances.
    Proportional {
        /// Proportional gain of the fallback law.
        kp: f64,
    },
}

impl Default for GainSchedule {
    fn default() -> Self {
        Self::NearSetpointDamping {
            band: 1.5,
            factor: 0.5,
        }
    }
}

impl GainSchedule {
    fn validate(&self) -> ControlResult<()> {
        match *self {
            Self::NearSetpointDamping { band, factor } => {
                if ensure_finite(band, "schedule band")? < 0.0 {
                    return Err(ControlError::InvalidArg {
                        what: "schedule band must be non-negative",
                    });
                }
                if ensure_finite(factor, "schedule factor")? < 0.0 {
                    return Err(ControlError::InvalidArg {
                        what: "schedule factor must be non-negative",
                    });
                }
            }
            Self::Proportional { kp } => {
                ensure_finite(kp, "schedule kp")?;
            }
        }
        Ok(())
    }
}

/// PID controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidController {
    /// Controller gains.
    pub gains: PidGains,
    /// Minimum output value.
    pub out_min: f64,
    /// Maximum output value.
    pub out_max: f64,
    /// Shaping used in gain-scheduled mode.
    #[serde(default)]
    pub schedule: GainSchedule,
}

impl PidController {
    /// Create a new PID controller with the default gain schedule.
    ///
    /// # Arguments
    ///
    /// * `gains` - Proportional, integral and derivative gains
    /// * `out_min` - Minimum output
    /// * `out_max` - Maximum output
    pub fn new(gains: PidGains, out_min: f64, out_max: f64) -> ControlResult<Self> {
        gains.validate()?;
        ensure_finite(out_min, "out_min")?;
        ensure_finite(out_max, "out_max")?;
        if out_min >= out_max {
            return Err(ControlError::InvalidArg {
                what: "out_min must be less than out_max",
            });
        }
        Ok(Self {
            gains,
            out_min,
            out_max,
            schedule: GainSchedule::default(),
        })
    }

    /// Replace the gain schedule.
    pub fn with_schedule(mut self, schedule: GainSchedule) -> ControlResult<Self> {
        schedule.validate()?;
        self.schedule = schedule;
        Ok(self)
    }

    /// Plain PID step.
    ///
    /// Returns the advanced state and the saturated output.
    pub fn update(
        &self,
        state: &ControllerState,
        pv: f64,
        sp: f64,
        sample: SampleConfig,
    ) -> (ControllerState, f64) {
        let dt = sample.dt();
        let error = sp - pv;

        let integral_term = state.integral_term + error * dt;
        let derivative = (error - state.previous_error) / dt;

        let PidGains { kp, ki, kd } = self.gains;
        let raw = kp * error + ki * integral_term + kd * derivative;
        let output = self.saturate(raw);

        let new_state = ControllerState {
            integral_term,
            previous_error: error,
        };

        (new_state, output)
    }

    /// Controller step for the selected mode.
    ///
    /// The full PID step always runs, so integral and previous error advance
    /// identically in both modes; only the returned output differs.
    pub fn compute(
        &self,
        state: &ControllerState,
        setpoint: f64,
        measured: f64,
        mode: Mode,
        sample: SampleConfig,
    ) -> (ControllerState, f64) {
        let (new_state, pid_output) = self.update(state, measured, setpoint, sample);

        let output = match mode {
            Mode::Pid => pid_output,
            Mode::GainScheduled => {
                let error = setpoint - measured;
                match self.schedule {
                    GainSchedule::NearSetpointDamping { band, factor } => {
                        if error.abs() < band {
                            self.saturate(pid_output * factor)
                        } else {
                            pid_output
                        }
                    }
                    GainSchedule::Proportional { kp } => self.saturate(kp * error),
                }
            }
        };

        (new_state, output)
    }

    fn saturate(&self, value: f64) -> f64 {
        value.clamp(self.out_min, self.out_max)
    }
}

/// Controller memory carried between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerState {
    /// Integral accumulator (error * seconds).
    pub integral_term: f64,
    /// Error seen on the previous tick.
    pub previous_error: f64,
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn output_always_within_limits(
            sp in -100.0_f64..100.0,
            pv in -100.0_f64..100.0,
            integral in -1.0e4_f64..1.0e4,
            prev in -100.0_f64..100.0,
            gs in any::<bool>(),
        ) {
            let pid = PidController::new(PidGains::new(1.8, 0.15, 0.6), -10.0, 10.0).unwrap();
            let state = ControllerState { integral_term: integral, previous_error: prev };
            let mode = if gs { Mode::GainScheduled } else { Mode::Pid };
            let (_, output) = pid.compute(&state, sp, pv, mode, SampleConfig::new(0.1).unwrap());
            prop_assert!((-10.0..=10.0).contains(&output));
        }

        #[test]
        fn scheduled_is_half_inside_band(
            sp in 1.0_f64..24.0,
            offset in -1.49_f64..1.49,
            integral in -50.0_f64..50.0,
            prev in -5.0_f64..5.0,
        ) {
            let pid = PidController::new(PidGains::new(2.0, 0.4, 0.2), -10.0, 10.0).unwrap();
            let state = ControllerState { integral_term: integral, previous_error: prev };
            let sample = SampleConfig::new(0.1).unwrap();
            let pv = sp - offset;
            let (_, plain) = pid.compute(&state, sp, pv, Mode::Pid, sample);
            let (_, damped) = pid.compute(&state, sp, pv, Mode::GainScheduled, sample);
            prop_assert_eq!(damped, plain * 0.5);
        }
    }
}
