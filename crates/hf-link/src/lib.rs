//! UDP link between the tank simulator and an operator station.
//!
//! Wire format is plain UTF-8, one message per datagram:
//! - operator to simulator: `SP:<float>` or `MODE:<token>`
//! - simulator to operator: `<level>,<control>` with two decimals each

pub mod codec;
pub mod error;
pub mod transport;

pub use codec::{Telemetry, encode_command, parse_command};
pub use error::{LinkError, LinkResult};
pub use transport::{
    DEFAULT_COMMAND_ADDR, DEFAULT_TELEMETRY_ADDR, MAX_DATAGRAM, OperatorLink, SimulatorLink,
    parse_addr,
};
