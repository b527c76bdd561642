//! Configuration validation.

use std::net::SocketAddr;
use std::time::Duration;

use hf_controls::GainSchedule;

use crate::schema::{LoopConfig, PlantDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid address: {field} = {addr}")]
    InvalidAddress { field: String, addr: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be non-negative"))
    }
}

fn period(field: &str, value: f64) -> Result<(), ValidationError> {
    positive(field, value)?;
    if Duration::try_from_secs_f64(value).is_ok() {
        Ok(())
    } else {
        Err(invalid(field, value, "too large for a loop period"))
    }
}

fn address(field: &str, addr: &str) -> Result<(), ValidationError> {
    addr.parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidAddress {
            field: field.to_string(),
            addr: addr.to_string(),
        })
}

pub fn validate_config(config: &LoopConfig) -> Result<(), ValidationError> {
    if config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    period("dt", config.dt)?;

    non_negative("initial.level", config.initial.level)?;
    finite("initial.setpoint", config.initial.setpoint)?;

    let c = &config.controller;
    finite("controller.kp", c.kp)?;
    finite("controller.ki", c.ki)?;
    finite("controller.kd", c.kd)?;
    finite("controller.out_min", c.out_min)?;
    finite("controller.out_max", c.out_max)?;
    if c.out_min >= c.out_max {
        return Err(invalid(
            "controller.out_min",
            c.out_min,
            "must be less than out_max",
        ));
    }
    match c.schedule {
        GainSchedule::NearSetpointDamping { band, factor } => {
            non_negative("controller.schedule.band", band)?;
            non_negative("controller.schedule.factor", factor)?;
        }
        GainSchedule::Proportional { kp } => finite("controller.schedule.kp", kp)?,
    }

    match config.plant {
        PlantDef::Discharge { k_u, k_d } => {
            finite("plant.k_u", k_u)?;
            non_negative("plant.k_d", k_d)?;
        }
        PlantDef::TimeConstant { tau, k } => {
            positive("plant.tau", tau)?;
            finite("plant.k", k)?;
        }
    }

    if config.history_capacity == Some(0) {
        return Err(invalid("history_capacity", 0, "must be at least 1"));
    }

    let range = config.display.setpoint_range;
    finite("display.setpoint_range.min", range.min)?;
    finite("display.setpoint_range.max", range.max)?;
    if range.min > range.max {
        return Err(invalid(
            "display.setpoint_range.min",
            range.min,
            "must not exceed max",
        ));
    }
    non_negative("display.setpoint_tolerance", config.display.setpoint_tolerance)?;

    address("link.bind", &config.link.bind)?;
    address("link.peer", &config.link.peer)?;

    Ok(())
}
