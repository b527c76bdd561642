//! Headless networked simulator: commands in, telemetry out, one thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

use hf_core::to_duration;
use hf_link::{SimulatorLink, parse_addr};
use hf_sim::{LoopDriver, LoopSample, SampleSink};

use crate::error::AppResult;
use crate::runtime_compile::LoopRuntime;

pub struct UdpService {
    driver: LoopDriver,
    link: SimulatorLink,
    ticks: u64,
    sink_open: bool,
}

impl UdpService {
    pub fn new(driver: LoopDriver, link: SimulatorLink) -> Self {
        Self {
            driver,
            link,
            ticks: 0,
            sink_open: true,
        }
    }

    /// Bind the addresses named in the runtime's link section.
    pub fn bind(runtime: LoopRuntime) -> AppResult<Self> {
        let bind = parse_addr(&runtime.link.bind)?;
        let peer = parse_addr(&runtime.link.peer)?;
        let link = SimulatorLink::bind(bind, peer)?;
        Ok(Self::new(runtime.driver, link))
    }

    pub fn driver(&self) -> &LoopDriver {
        &self.driver
    }

    pub fn link(&self) -> &SimulatorLink {
        &self.link
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Apply pending commands, advance one tick and publish telemetry.
    ///
    /// Time is `ticks * dt`. A failed send is logged and the tick still
    /// counts.
    pub fn tick(&mut self) -> LoopSample {
        for update in self.link.poll_commands() {
            self.driver.apply(update);
        }

        self.ticks += 1;
        let time = self.ticks as f64 * self.driver.sample().dt();
        let sample = self.driver.step(time);
        let command = self.driver.command();

        match self.link.publish(&sample, &command) {
            Ok(()) => {
                if !self.sink_open {
                    tracing::info!("telemetry delivery recovered");
                }
                self.sink_open = true;
            }
            Err(err) => {
                if self.sink_open {
                    tracing::warn!(%err, "telemetry not delivered; loop keeps running");
                }
                self.sink_open = false;
            }
        }
        tracing::debug!(
            time,
            level = sample.level,
            control = sample.control,
            setpoint = command.setpoint,
            mode = %command.mode,
            "tick"
        );
        sample
    }

    /// Tick in real time until `shutdown` is set or `max_ticks` ran.
    pub fn run(&mut self, max_ticks: Option<u64>, shutdown: &AtomicBool) {
        let period = to_duration(self.driver.sample().period());
        tracing::info!(
            rate_hz = self.driver.sample().frequency(),
            setpoint = self.driver.command().setpoint,
            "UDP simulator started"
        );

        let mut ran = 0u64;
        while !shutdown.load(Ordering::Relaxed) && max_ticks.is_none_or(|max| ran < max) {
            let tick_start = Instant::now();
            self.tick();
            ran += 1;
            thread::sleep(period.saturating_sub(tick_start.elapsed()));
        }

        tracing::info!(
            ticks = self.ticks,
            level = self.driver.level(),
            "UDP simulator stopped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hf_config::Preset;

    use crate::runtime_compile::compile_loop;

    fn service_with_peer(peer: &str) -> UdpService {
        let mut config = Preset::Network.config();
        config.link.bind = "127.0.0.1:0".to_string();
        config.link.peer = peer.to_string();
        UdpService::bind(compile_loop(&config).unwrap()).unwrap()
    }

    #[test]
    fn ticks_without_any_operator() {
        // Port 9 (discard) on loopback: sends succeed or fail, either way
        // the loop keeps going.
        let mut service = service_with_peer("127.0.0.1:9");
        let first = service.tick();
        assert_eq!(first.control, 10.0);
        assert!((first.level - 5.675).abs() < 1e-12);
        for _ in 0..9 {
            service.tick();
        }
        assert_eq!(service.ticks(), 10);
        assert!((service.driver().plant_state().level - first.level).abs() > 0.0);
    }

    #[test]
    fn run_stops_after_max_ticks() {
        let mut service = service_with_peer("127.0.0.1:9");
        let shutdown = AtomicBool::new(false);
        service.run(Some(3), &shutdown);
        assert_eq!(service.ticks(), 3);
    }

    #[test]
    fn run_honours_shutdown_flag() {
        let mut service = service_with_peer("127.0.0.1:9");
        let shutdown = AtomicBool::new(true);
        service.run(None, &shutdown);
        assert_eq!(service.ticks(), 0);
    }
}
