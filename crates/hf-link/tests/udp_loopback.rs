//! Integration test: simulator and operator endpoints over loopback UDP.
//!
//! Every socket binds port 0 so tests can run in parallel.

use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use hf_controls::Mode;
use hf_link::{OperatorLink, SimulatorLink, Telemetry};
use hf_sim::{CommandUpdate, LoopCommand, LoopSample, SampleSink};

fn any_local() -> SocketAddr {
    "127.0.0.1:0".parse().unwrap()
}

/// Poll until `want` commands arrived or a second passed.
fn poll_until(sim: &SimulatorLink, want: usize) -> Vec<CommandUpdate> {
    let deadline = Instant::now() + Duration::from_secs(1);
    let mut got = Vec::new();
    while got.len() < want && Instant::now() < deadline {
        got.extend(sim.poll_commands());
        std::thread::sleep(Duration::from_millis(5));
    }
    got
}

#[test]
fn commands_reach_simulator_in_order() {
    let sim = SimulatorLink::bind(any_local(), any_local()).unwrap();
    let op = OperatorLink::sender(sim.command_addr().unwrap()).unwrap();

    op.send_command(&CommandUpdate::Setpoint(12.0)).unwrap();
    op.send_command(&CommandUpdate::Mode(Mode::GainScheduled))
        .unwrap();

    let got = poll_until(&sim, 2);
    assert_eq!(
        got,
        vec![
            CommandUpdate::Setpoint(12.0),
            CommandUpdate::Mode(Mode::GainScheduled)
        ]
    );
}

#[test]
fn malformed_commands_are_dropped() {
    let sim = SimulatorLink::bind(any_local(), any_local()).unwrap();
    let op = OperatorLink::sender(sim.command_addr().unwrap()).unwrap();

    op.send_raw("SP:abnormal").unwrap();
    op.send_raw("MODE:FUZZY").unwrap();
    op.send_raw("HELLO").unwrap();
    op.send_raw("SP:8").unwrap();

    let got = poll_until(&sim, 1);
    assert_eq!(got, vec![CommandUpdate::Setpoint(8.0)]);
}

#[test]
fn poll_without_traffic_returns_immediately() {
    let sim = SimulatorLink::bind(any_local(), any_local()).unwrap();
    let started = Instant::now();
    assert!(sim.poll_commands().is_empty());
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[test]
fn telemetry_reaches_operator() {
    // Commands from this endpoint go nowhere; only its telemetry socket is used.
    let op = OperatorLink::bind(any_local(), any_local()).unwrap();
    let mut sim = SimulatorLink::bind(any_local(), op.telemetry_addr().unwrap()).unwrap();

    let sample = LoopSample {
        time: 0.1,
        level: 5.675,
        control: 10.0,
    };
    sim.publish(&sample, &LoopCommand::new(10.0, Mode::Pid))
        .unwrap();

    let telemetry = op
        .recv_telemetry(Duration::from_secs(1))
        .unwrap()
        .unwrap();
    assert_eq!(
        telemetry,
        Telemetry {
            level: 5.67,
            control: 10.0
        }
    );
}

#[test]
fn telemetry_timeout_yields_none() {
    let op = OperatorLink::bind(any_local(), any_local()).unwrap();
    let got = op.recv_telemetry(Duration::from_millis(20)).unwrap();
    assert!(got.is_none());
}

#[test]
fn malformed_telemetry_is_skipped() {
    let op = OperatorLink::bind(any_local(), any_local()).unwrap();
    let telemetry_addr = op.telemetry_addr().unwrap();
    let mut sim = SimulatorLink::bind(any_local(), telemetry_addr).unwrap();

    let noise = UdpSocket::bind(any_local()).unwrap();
    noise.send_to(b"level=high", telemetry_addr).unwrap();
    noise.send_to(&[0xff, 0xfe], telemetry_addr).unwrap();
    let sample = LoopSample {
        time: 0.1,
        level: 7.5,
        control: -2.0,
    };
    sim.publish(&sample, &LoopCommand::new(5.0, Mode::Pid))
        .unwrap();

    let telemetry = op
        .next_telemetry(Duration::from_secs(1))
        .unwrap()
        .unwrap();
    assert_eq!(
        telemetry,
        Telemetry {
            level: 7.5,
            control: -2.0
        }
    );
}

#[test]
fn next_telemetry_times_out_on_noise_only() {
    let op = OperatorLink::bind(any_local(), any_local()).unwrap();
    let noise = UdpSocket::bind(any_local()).unwrap();
    noise
        .send_to(b"garbage", op.telemetry_addr().unwrap())
        .unwrap();

    let got = op.next_telemetry(Duration::from_millis(50)).unwrap();
    assert!(got.is_none());
}
