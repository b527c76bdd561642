//! Real-time loop on a background thread for interactive front ends.
//!
//! The worker owns the [`LoopDriver`]. The foreground writes operator input
//! into a single-slot command cell and drains samples from a bounded ring
//! buffer; it never blocks on the tick thread for longer than a push.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use hf_controls::Mode;
use hf_core::to_duration;
use hf_sim::{History, LoopCommand, LoopDriver, LoopSample, SampleSink, SinkError};

use crate::error::{AppError, AppResult};

/// Latest-value command cell shared with the tick thread.
#[derive(Debug, Clone)]
struct CommandSlot(Arc<Mutex<LoopCommand>>);

impl CommandSlot {
    fn new(command: LoopCommand) -> Self {
        Self(Arc::new(Mutex::new(command)))
    }

    // A panic while holding the lock cannot leave a `Copy` value half
    // written, so a poisoned lock is still safe to read.
    fn get(&self) -> LoopCommand {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, f: impl FnOnce(&mut LoopCommand)) {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}

/// Handoff buffer size when the driver carries no bounded history.
pub const DEFAULT_HANDOFF_CAPACITY: usize = 200;

/// Bounded sample buffer shared with the tick thread. A full buffer evicts
/// its oldest sample.
#[derive(Debug, Clone)]
struct SampleBuffer(Arc<Mutex<History>>);

impl SampleBuffer {
    fn new(history: History) -> Self {
        Self(Arc::new(Mutex::new(history)))
    }

    fn drain(&self) -> Vec<LoopSample> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).drain()
    }
}

impl SampleSink for SampleBuffer {
    fn publish(&mut self, sample: &LoopSample, _command: &LoopCommand) -> Result<(), SinkError> {
        let mut history = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        match history.push(*sample) {
            None => Ok(()),
            Some(_) => Err(SinkError::Overflow),
        }
    }
}

pub struct LoopWorker {
    samples: SampleBuffer,
    capacity: usize,
    command: CommandSlot,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl LoopWorker {
    /// Spawn the tick thread. Ticks run every `driver.sample()` period,
    /// stamped with seconds since start.
    ///
    /// A bounded history on `driver` becomes the handoff buffer; otherwise
    /// one of [`DEFAULT_HANDOFF_CAPACITY`] samples is used.
    pub fn start(mut driver: LoopDriver) -> AppResult<Self> {
        let history = match driver.take_history() {
            Some(history) if history.capacity().is_some() => history,
            _ => History::bounded(DEFAULT_HANDOFF_CAPACITY)?,
        };
        let capacity = history.capacity().unwrap_or(DEFAULT_HANDOFF_CAPACITY);
        let samples = SampleBuffer::new(history);
        let command = CommandSlot::new(driver.command());
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = thread::Builder::new()
            .name("hf-loop".to_string())
            .spawn({
                let command = command.clone();
                let shutdown = Arc::clone(&shutdown);
                let sink = samples.clone();
                move || run_loop(driver, sink, command, shutdown)
            })
            .map_err(|e| AppError::Worker {
                message: format!("failed to spawn loop thread: {e}"),
            })?;

        Ok(Self {
            samples,
            capacity,
            command,
            shutdown,
            handle: Some(handle),
        })
    }

    pub fn command(&self) -> LoopCommand {
        self.command.get()
    }

    /// Applied from the next tick on.
    pub fn set_setpoint(&self, setpoint: f64) {
        self.command.update(|c| c.setpoint = setpoint);
    }

    pub fn set_mode(&self, mode: Mode) {
        self.command.update(|c| c.mode = mode);
    }

    pub fn set_command(&self, command: LoopCommand) {
        self.command.update(|c| *c = command);
    }

    /// Samples produced since the last call, oldest first. At most
    /// [`LoopWorker::capacity`] are kept between calls.
    pub fn drain(&self) -> Vec<LoopSample> {
        self.samples.drain()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the tick thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("loop thread panicked");
            }
        }
    }
}

impl Drop for LoopWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    mut driver: LoopDriver,
    mut sink: impl SampleSink,
    command: CommandSlot,
    shutdown: Arc<AtomicBool>,
) {
    let period = to_duration(driver.sample().period());
    let start = Instant::now();
    let mut sink_open = true;
    tracing::info!(period_ms = period.as_millis() as u64, "loop started");

    while !shutdown.load(Ordering::Relaxed) {
        let tick_start = Instant::now();

        let cmd = command.get();
        driver.set_command(cmd);
        let sample = driver.step(start.elapsed().as_secs_f64());

        match sink.publish(&sample, &cmd) {
            Ok(()) => {
                if !sink_open {
                    tracing::info!("sample delivery resumed");
                }
                sink_open = true;
            }
            Err(err) if sink_open => {
                tracing::warn!(%err, "sample not delivered; loop keeps running");
                sink_open = false;
            }
            Err(_) => {}
        }

        sleep_remaining(period, tick_start.elapsed(), &shutdown);
    }

    tracing::info!(level = driver.level(), "loop stopped");
}

/// Sleep out the rest of the period in short slices so shutdown is prompt.
fn sleep_remaining(period: Duration, spent: Duration, shutdown: &AtomicBool) {
    const SLICE: Duration = Duration::from_millis(20);
    let mut remaining = period.saturating_sub(spent);
    while !remaining.is_zero() && !shutdown.load(Ordering::Relaxed) {
        let nap = remaining.min(SLICE);
        thread::sleep(nap);
        remaining -= nap;
    }
}
