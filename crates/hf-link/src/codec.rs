//! Text codec for commands and telemetry.

use hf_controls::Mode;
use hf_sim::{CommandUpdate, LoopSample};

use crate::error::{LinkError, LinkResult};

const SETPOINT_PREFIX: &str = "SP:";
const MODE_PREFIX: &str = "MODE:";

/// Parse one inbound command datagram.
///
/// Surrounding whitespace is ignored. The setpoint must be a finite number;
/// the mode token is matched case-insensitively (see [`Mode`]'s `FromStr`).
///
/// # Examples
///
/// ```
/// use hf_controls::Mode;
/// use hf_link::parse_command;
/// use hf_sim::CommandUpdate;
///
/// assert_eq!(parse_command("SP:12.5").unwrap(), CommandUpdate::Setpoint(12.5));
/// assert_eq!(parse_command("MODE:MPC").unwrap(), CommandUpdate::Mode(Mode::GainScheduled));
/// assert!(parse_command("SP:abnormal").is_err());
/// ```
pub fn parse_command(message: &str) -> LinkResult<CommandUpdate> {
    let message = message.trim();

    if let Some(value) = message.strip_prefix(SETPOINT_PREFIX) {
        let setpoint: f64 = value.trim().parse().map_err(|e| LinkError::Malformed {
            message: message.to_string(),
            reason: format!("setpoint: {e}"),
        })?;
        if !setpoint.is_finite() {
            return Err(LinkError::Malformed {
                message: message.to_string(),
                reason: "setpoint must be finite".to_string(),
            });
        }
        return Ok(CommandUpdate::Setpoint(setpoint));
    }

    if let Some(token) = message.strip_prefix(MODE_PREFIX) {
        let mode: Mode = token.parse().map_err(|e: hf_controls::ControlError| {
            LinkError::Malformed {
                message: message.to_string(),
                reason: e.to_string(),
            }
        })?;
        return Ok(CommandUpdate::Mode(mode));
    }

    Err(LinkError::UnknownCommand {
        message: message.to_string(),
    })
}

/// Render a command in wire form.
pub fn encode_command(update: &CommandUpdate) -> String {
    match update {
        CommandUpdate::Setpoint(sp) => format!("{SETPOINT_PREFIX}{sp}"),
        CommandUpdate::Mode(mode) => format!("{MODE_PREFIX}{}", mode.label()),
    }
}

/// One outbound telemetry datagram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Telemetry {
    pub level: f64,
    pub control: f64,
}

impl Telemetry {
    /// `level,control`, two decimals each.
    pub fn encode(&self) -> String {
        format!("{:.2},{:.2}", self.level, self.control)
    }

    pub fn decode(message: &str) -> LinkResult<Self> {
        let malformed = |reason: &str| LinkError::Malformed {
            message: message.to_string(),
            reason: reason.to_string(),
        };

        let (level, control) = message
            .trim()
            .split_once(',')
            .ok_or_else(|| malformed("expected `level,control`"))?;
        let level = level
            .trim()
            .parse()
            .map_err(|_| malformed("level is not a number"))?;
        let control = control
            .trim()
            .parse()
            .map_err(|_| malformed("control is not a number"))?;
        Ok(Self { level, control })
    }
}

impl From<&LoopSample> for Telemetry {
    fn from(sample: &LoopSample) -> Self {
        Self {
            level: sample.level,
            control: sample.control,
        }
    }
}
