//! Offline runner and result recording.
//!
//! Runs the loop as fast as possible on simulated time `t = n * dt`, so a
//! scenario is reproducible regardless of wall-clock jitter.

use serde::{Deserialize, Serialize};

use crate::control_loop::{CommandUpdate, LoopDriver, LoopSample};
use crate::error::{SimError, SimResult};

/// Options for offline runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of ticks (safety limit)
    pub max_steps: usize,
    /// Record every N-th tick (decimation)
    pub record_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            t_end: 60.0,
            max_steps: 1_000_000,
            record_every: 1,
        }
    }
}

/// An operator change that takes effect at a given simulated time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledCommand {
    /// Simulated time (seconds) at which the change applies.
    pub at_s: f64,
    pub update: CommandUpdate,
}

/// Time-ordered list of scheduled commands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandSchedule {
    entries: Vec<ScheduledCommand>,
}

impl CommandSchedule {
    pub fn new(mut entries: Vec<ScheduledCommand>) -> SimResult<Self> {
        if entries.iter().any(|e| !e.at_s.is_finite() || e.at_s < 0.0) {
            return Err(SimError::InvalidArg {
                what: "scheduled command time must be finite and non-negative",
            });
        }
        // Stable sort keeps same-time commands in the order given.
        entries.sort_by(|a, b| a.at_s.total_cmp(&b.at_s));
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ScheduledCommand] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Recorded run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimRecord {
    pub samples: Vec<LoopSample>,
}

impl SimRecord {
    pub fn last(&self) -> Option<&LoopSample> {
        self.samples.last()
    }

    /// `time_s,level,control` rows with a header line.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("time_s,level,control\n");
        for s in &self.samples {
            csv.push_str(&format!("{:.3},{:.4},{:.4}\n", s.time, s.level, s.control));
        }
        csv
    }
}

/// Advance `driver` until `t_end`, applying `schedule` on the way.
///
/// The initial state is recorded at `t = 0` with zero control; the final
/// tick is always recorded.
pub fn run_sim(
    driver: &mut LoopDriver,
    opts: &SimOptions,
    schedule: &CommandSchedule,
) -> SimResult<SimRecord> {
    if !opts.t_end.is_finite() || opts.t_end < 0.0 {
        return Err(SimError::InvalidArg {
            what: "t_end must be finite and non-negative",
        });
    }
    if opts.max_steps == 0 {
        return Err(SimError::InvalidArg {
            what: "max_steps must be positive",
        });
    }
    if opts.record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }

    let dt = driver.sample().dt();
    // Guards against `n * dt` landing a hair below t_end.
    let eps = 1e-9 * dt;

    let mut samples = vec![LoopSample {
        time: 0.0,
        level: driver.level(),
        control: 0.0,
    }];

    let mut pending = schedule.entries().iter().peekable();
    let mut step = 0usize;
    let mut t = 0.0;
    let mut unrecorded: Option<LoopSample> = None;

    while t + eps < opts.t_end && step < opts.max_steps {
        while let Some(entry) = pending.next_if(|e| e.at_s <= t + eps) {
            driver.apply(entry.update);
        }

        step += 1;
        t = step as f64 * dt;
        let sample = driver.step(t);

        if step % opts.record_every == 0 {
            samples.push(sample);
            unrecorded = None;
        } else {
            unrecorded = Some(sample);
        }
    }

    if let Some(sample) = unrecorded {
        samples.push(sample);
    }

    tracing::debug!(steps = step, recorded = samples.len(), "offline run finished");
    Ok(SimRecord { samples })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.t_end, 60.0);
        assert_eq!(opts.record_every, 1);
    }

    #[test]
    fn schedule_sorts_by_time() {
        let schedule = CommandSchedule::new(vec![
            ScheduledCommand {
                at_s: 5.0,
                update: CommandUpdate::Setpoint(12.0),
            },
            ScheduledCommand {
                at_s: 1.0,
                update: CommandUpdate::Setpoint(8.0),
            },
        ])
        .unwrap();
        let times: Vec<f64> = schedule.entries().iter().map(|e| e.at_s).collect();
        assert_eq!(times, vec![1.0, 5.0]);
    }

    #[test]
    fn schedule_rejects_negative_times() {
        let result = CommandSchedule::new(vec![ScheduledCommand {
            at_s: -1.0,
            update: CommandUpdate::Setpoint(8.0),
        }]);
        assert!(result.is_err());
    }
}
