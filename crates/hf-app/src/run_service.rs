//! Offline (simulated-time) run execution.

use std::time::Instant;

use hf_config::LoopConfig;
use hf_controls::Mode;
use hf_sim::{
    CommandSchedule, CommandUpdate, ScheduledCommand, SetpointStatus, SimOptions, SimRecord,
    run_sim,
};

use crate::error::{AppError, AppResult};
use crate::runtime_compile::compile_loop;

/// Request to execute an offline run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub config: LoopConfig,
    pub options: SimOptions,
    pub schedule: CommandSchedule,
}

/// Concise end-of-run summary.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub steps: usize,
    pub final_level: f64,
    pub final_control: f64,
    pub final_setpoint: f64,
    pub final_mode: Mode,
    pub status: SetpointStatus,
    pub wall_time_s: f64,
}

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub record: SimRecord,
    pub summary: RunSummary,
}

/// Compile the config and run it on simulated time.
pub fn run_offline(request: &RunRequest) -> AppResult<RunResponse> {
    let start = Instant::now();
    let runtime = compile_loop(&request.config)?;
    let mut driver = runtime.driver;

    let record = run_sim(&mut driver, &request.options, &request.schedule)?;

    let (final_level, final_control) = record
        .last()
        .map(|s| (s.level, s.control))
        .unwrap_or((driver.level(), 0.0));
    let command = driver.command();
    let steps = (record.last().map_or(0.0, |s| s.time) / driver.sample().dt()).round() as usize;

    let summary = RunSummary {
        steps,
        final_level,
        final_control,
        final_setpoint: command.setpoint,
        final_mode: command.mode,
        status: SetpointStatus::classify(final_level, command.setpoint, runtime.setpoint_tolerance),
        wall_time_s: start.elapsed().as_secs_f64(),
    };
    tracing::info!(
        steps = summary.steps,
        final_level = summary.final_level,
        wall_time_s = summary.wall_time_s,
        "offline run complete"
    );

    Ok(RunResponse { record, summary })
}

/// Parse a `T:VALUE` step: `VALUE` is a setpoint number or a mode token.
///
/// `"30:15"` sets the setpoint to 15 at t = 30 s; `"30:MPC"` switches mode.
pub fn parse_step(text: &str) -> AppResult<ScheduledCommand> {
    let (at, value) = text
        .split_once(':')
        .ok_or_else(|| AppError::InvalidInput(format!("step {text:?}: expected T:VALUE")))?;
    let at_s: f64 = at
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("step {text:?}: bad time {at:?}")))?;

    let value = value.trim();
    let update = match value.parse::<f64>() {
        Ok(sp) if sp.is_finite() => CommandUpdate::Setpoint(sp),
        Ok(_) => {
            return Err(AppError::InvalidInput(format!(
                "step {text:?}: setpoint must be finite"
            )));
        }
        Err(_) => CommandUpdate::Mode(value.parse::<Mode>()?),
    };
    Ok(ScheduledCommand { at_s, update })
}
