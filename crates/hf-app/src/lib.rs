//! Shared application service layer for hydraflow.
//!
//! Gives CLI and GUI one place for config resolution, loop compilation,
//! offline runs, the real-time background worker and the UDP simulator.

pub mod config_service;
pub mod error;
pub mod loop_worker;
pub mod run_service;
pub mod runtime_compile;
pub mod udp_service;

pub use config_service::{init_config, resolve_config, validate_file};
pub use error::{AppError, AppResult};
pub use loop_worker::LoopWorker;
pub use run_service::{RunRequest, RunResponse, RunSummary, parse_step, run_offline};
pub use runtime_compile::{LoopRuntime, build_controller, build_plant, compile_loop};
pub use udp_service::UdpService;
