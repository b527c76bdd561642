//! Integration test: a networked simulator driven by an operator endpoint
//! over loopback UDP.

use std::time::{Duration, Instant};

use hf_app::{UdpService, compile_loop};
use hf_config::Preset;
use hf_controls::Mode;
use hf_link::OperatorLink;
use hf_sim::{CommandUpdate, LoopCommand};

struct Session {
    service: UdpService,
    telemetry: OperatorLink,
    commands: OperatorLink,
}

fn session() -> Session {
    let telemetry = OperatorLink::bind(
        "127.0.0.1:0".parse().unwrap(),
        "127.0.0.1:9".parse().unwrap(),
    )
    .unwrap();

    let mut config = Preset::Network.config();
    config.link.bind = "127.0.0.1:0".to_string();
    config.link.peer = telemetry.telemetry_addr().unwrap().to_string();
    let service = UdpService::bind(compile_loop(&config).unwrap()).unwrap();

    let commands = OperatorLink::sender(service.link().command_addr().unwrap()).unwrap();
    Session {
        service,
        telemetry,
        commands,
    }
}

/// Tick until the command is visible or a second passed.
fn tick_until(service: &mut UdpService, want: LoopCommand) {
    let deadline = Instant::now() + Duration::from_secs(1);
    while service.driver().command() != want && Instant::now() < deadline {
        service.tick();
        std::thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn first_tick_telemetry_matches_wire_format() {
    let mut s = session();
    s.service.tick();

    let t = s
        .telemetry
        .recv_telemetry(Duration::from_secs(1))
        .unwrap()
        .unwrap();
    assert_eq!(t.level, 5.67);
    assert_eq!(t.control, 10.0);
}

#[test]
fn setpoint_and_mode_commands_apply() {
    let mut s = session();
    s.commands
        .send_command(&CommandUpdate::Setpoint(12.0))
        .unwrap();
    s.commands.send_raw("MODE:MPC").unwrap();

    tick_until(&mut s.service, LoopCommand::new(12.0, Mode::GainScheduled));
    assert_eq!(
        s.service.driver().command(),
        LoopCommand::new(12.0, Mode::GainScheduled)
    );
}

#[test]
fn malformed_setpoint_leaves_loop_running() {
    let mut s = session();
    s.commands.send_raw("SP:abnormal").unwrap();
    s.commands.send_raw("SP:7").unwrap();

    tick_until(&mut s.service, LoopCommand::new(7.0, Mode::Pid));
    assert_eq!(s.service.driver().command().setpoint, 7.0);
    assert!(s.service.ticks() >= 1);
}

#[test]
fn unknown_mode_keeps_last_valid_mode() {
    let mut s = session();
    s.commands.send_raw("MODE:MPC").unwrap();
    tick_until(&mut s.service, LoopCommand::new(10.0, Mode::GainScheduled));

    s.commands.send_raw("MODE:FUZZY").unwrap();
    s.commands.send_raw("SP:11").unwrap();
    tick_until(&mut s.service, LoopCommand::new(11.0, Mode::GainScheduled));

    assert_eq!(s.service.driver().command().mode, Mode::GainScheduled);
}
