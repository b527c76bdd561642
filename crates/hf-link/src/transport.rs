//! UDP endpoints for both ends of the link.
//!
//! Each endpoint owns a receive socket bound to its well-known address and a
//! separate ephemeral socket for sending, so the two directions never share
//! buffers.

use std::io::ErrorKind;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use hf_sim::{CommandUpdate, LoopCommand, LoopSample, SampleSink, SinkError};

use crate::codec::{Telemetry, encode_command, parse_command};
use crate::error::{LinkError, LinkResult};

/// Where the simulator listens for operator commands.
pub const DEFAULT_COMMAND_ADDR: &str = "127.0.0.1:5006";
/// Where the operator station listens for telemetry.
pub const DEFAULT_TELEMETRY_ADDR: &str = "127.0.0.1:5005";
/// Receive buffer size; longer datagrams are truncated by the OS.
pub const MAX_DATAGRAM: usize = 1024;

/// Parse a `host:port` string into a socket address.
pub fn parse_addr(addr: &str) -> LinkResult<SocketAddr> {
    addr.parse().map_err(|source| LinkError::Address {
        addr: addr.to_string(),
        source,
    })
}

fn ephemeral_for(peer: SocketAddr) -> LinkResult<UdpSocket> {
    let local: SocketAddr = match peer {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };
    Ok(UdpSocket::bind(local)?)
}

fn decode_utf8(bytes: &[u8]) -> LinkResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| LinkError::Malformed {
        message: String::from_utf8_lossy(bytes).into_owned(),
        reason: e.to_string(),
    })
}

/// Simulator side: non-blocking command intake, telemetry out.
#[derive(Debug)]
pub struct SimulatorLink {
    rx: UdpSocket,
    tx: UdpSocket,
    peer: SocketAddr,
}

impl SimulatorLink {
    /// Bind the command socket on `command_addr` and target telemetry at
    /// `telemetry_peer`.
    pub fn bind(command_addr: SocketAddr, telemetry_peer: SocketAddr) -> LinkResult<Self> {
        let rx = UdpSocket::bind(command_addr)?;
        rx.set_nonblocking(true)?;
        let tx = ephemeral_for(telemetry_peer)?;
        tracing::info!(%command_addr, %telemetry_peer, "simulator link bound");
        Ok(Self {
            rx,
            tx,
            peer: telemetry_peer,
        })
    }

    /// Address the command socket actually bound to (useful with port 0).
    pub fn command_addr(&self) -> LinkResult<SocketAddr> {
        Ok(self.rx.local_addr()?)
    }

    pub fn telemetry_peer(&self) -> SocketAddr {
        self.peer
    }

    /// Drain every pending command datagram without blocking.
    ///
    /// Malformed datagrams are logged and dropped; the remaining ones are
    /// returned in arrival order. A socket error other than "would block"
    /// ends the drain early.
    pub fn poll_commands(&self) -> Vec<CommandUpdate> {
        let mut updates = Vec::new();
        let mut buf = [0u8; MAX_DATAGRAM];
        loop {
            match self.rx.recv_from(&mut buf) {
                Ok((len, from)) => {
                    match decode_utf8(&buf[..len]).and_then(parse_command) {
                        Ok(update) => {
                            tracing::debug!(%from, ?update, "command received");
                            updates.push(update);
                        }
                        Err(err) => tracing::warn!(%from, %err, "discarding command"),
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                // Windows reports ICMP port-unreachable on the next recv.
                Err(e) if e.kind() == ErrorKind::ConnectionReset => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "command socket error");
                    break;
                }
            }
        }
        updates
    }

    pub fn send_telemetry(&self, telemetry: &Telemetry) -> LinkResult<()> {
        self.tx.send_to(telemetry.encode().as_bytes(), self.peer)?;
        Ok(())
    }
}

impl SampleSink for SimulatorLink {
    fn publish(&mut self, sample: &LoopSample, _command: &LoopCommand) -> Result<(), SinkError> {
        self.send_telemetry(&Telemetry::from(sample))
            .map_err(|e| SinkError::Transport {
                message: e.to_string(),
            })
    }
}

/// Operator side: sends commands, receives telemetry.
#[derive(Debug)]
pub struct OperatorLink {
    rx: UdpSocket,
    tx: UdpSocket,
    simulator: SocketAddr,
}

impl OperatorLink {
    /// Bind the telemetry socket on `telemetry_addr` and target commands at
    /// the simulator's `command_addr`.
    pub fn bind(telemetry_addr: SocketAddr, command_addr: SocketAddr) -> LinkResult<Self> {
        let rx = UdpSocket::bind(telemetry_addr)?;
        let tx = ephemeral_for(command_addr)?;
        Ok(Self {
            rx,
            tx,
            simulator: command_addr,
        })
    }

    /// Command-only endpoint: no telemetry socket is held on a well-known
    /// port.
    pub fn sender(command_addr: SocketAddr) -> LinkResult<Self> {
        let rx = ephemeral_for(command_addr)?;
        let tx = ephemeral_for(command_addr)?;
        Ok(Self {
            rx,
            tx,
            simulator: command_addr,
        })
    }

    pub fn telemetry_addr(&self) -> LinkResult<SocketAddr> {
        Ok(self.rx.local_addr()?)
    }

    pub fn send_command(&self, update: &CommandUpdate) -> LinkResult<()> {
        self.send_raw(&encode_command(update))
    }

    /// Send an arbitrary text datagram to the simulator.
    pub fn send_raw(&self, message: &str) -> LinkResult<()> {
        self.tx.send_to(message.as_bytes(), self.simulator)?;
        Ok(())
    }

    /// Wait up to `timeout` for the next well-formed telemetry datagram.
    /// Malformed datagrams are logged and skipped.
    pub fn next_telemetry(&self, timeout: Duration) -> LinkResult<Option<Telemetry>> {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => timeout,
            };
            if remaining.is_zero() {
                return Ok(None);
            }
            match self.recv_telemetry(remaining) {
                Err(err @ LinkError::Malformed { .. }) => {
                    tracing::warn!(%err, "discarding malformed telemetry");
                }
                other => return other,
            }
        }
    }

    /// Wait up to `timeout` for one telemetry datagram.
    ///
    /// Returns `Ok(None)` when nothing arrived in time.
    pub fn recv_telemetry(&self, timeout: Duration) -> LinkResult<Option<Telemetry>> {
        // A zero timeout means "block forever" to the OS.
        self.rx
            .set_read_timeout(Some(timeout.max(Duration::from_millis(1))))?;
        let mut buf = [0u8; MAX_DATAGRAM];
        match self.rx.recv_from(&mut buf) {
            Ok((len, _)) => {
                let text = decode_utf8(&buf[..len])?;
                Telemetry::decode(text).map(Some)
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
