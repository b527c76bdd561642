use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use hf_app::{AppError, AppResult, RunRequest, UdpService, config_service, run_service};
use hf_config::Preset;
use hf_controls::Mode;
use hf_link::{DEFAULT_COMMAND_ADDR, DEFAULT_TELEMETRY_ADDR, OperatorLink, parse_addr};
use hf_sim::{CommandSchedule, SimOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hf-cli")]
#[command(about = "HydraFlow CLI - tank level control simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the loop offline on simulated time and export CSV
    Simulate {
        /// Config file (YAML or JSON); overrides --preset
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Built-in parameter set (display, network)
        #[arg(long, default_value = "display")]
        preset: Preset,
        /// End time in seconds
        #[arg(long, default_value_t = 60.0)]
        t_end: f64,
        /// Record every N-th tick
        #[arg(long, default_value_t = 1)]
        record_every: usize,
        /// Initial setpoint override
        #[arg(long)]
        setpoint: Option<f64>,
        /// Initial mode override (PID, MPC)
        #[arg(long)]
        mode: Option<Mode>,
        /// Scheduled change T:VALUE, e.g. 30:15 or 60:MPC (repeatable)
        #[arg(long = "step")]
        steps: Vec<String>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the networked simulator in real time
    Serve {
        /// Config file (YAML or JSON); overrides --preset
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Built-in parameter set (display, network)
        #[arg(long, default_value = "network")]
        preset: Preset,
        /// Stop after this many ticks (runs forever when omitted)
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Send one command datagram to a running simulator
    Send {
        /// Command text, e.g. SP:12 or MODE:MPC
        command: String,
        /// Simulator command address
        #[arg(long, default_value = DEFAULT_COMMAND_ADDR)]
        to: String,
    },
    /// Print telemetry received from a running simulator
    Monitor {
        /// Address to receive telemetry on
        #[arg(long, default_value = DEFAULT_TELEMETRY_ADDR)]
        bind: String,
        /// Stop after this many datagrams
        #[arg(long)]
        count: Option<usize>,
        /// Give up after this many seconds without telemetry
        #[arg(long, default_value_t = 5.0)]
        timeout_s: f64,
    },
    /// Manage config files
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a preset to a new config file
    Init {
        /// Destination path (.yaml or .json)
        path: PathBuf,
        /// Built-in parameter set (display, network)
        #[arg(long, default_value = "display")]
        preset: Preset,
    },
    /// Validate a config file
    Validate {
        /// Path to the config file
        path: PathBuf,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            preset,
            t_end,
            record_every,
            setpoint,
            mode,
            steps,
            output,
        } => cmd_simulate(
            config.as_deref(),
            preset,
            SimOptions {
                t_end,
                record_every,
                ..SimOptions::default()
            },
            setpoint,
            mode,
            &steps,
            output.as_deref(),
        ),
        Commands::Serve {
            config,
            preset,
            ticks,
        } => cmd_serve(config.as_deref(), preset, ticks),
        Commands::Send { command, to } => cmd_send(&command, &to),
        Commands::Monitor {
            bind,
            count,
            timeout_s,
        } => cmd_monitor(&bind, count, timeout_s),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init { path, preset } => cmd_config_init(&path, preset),
            ConfigCommands::Validate { path } => cmd_config_validate(&path),
        },
    }
}

fn cmd_simulate(
    config_path: Option<&Path>,
    preset: Preset,
    options: SimOptions,
    setpoint: Option<f64>,
    mode: Option<Mode>,
    steps: &[String],
    output: Option<&Path>,
) -> AppResult<()> {
    let mut config = config_service::resolve_config(config_path, preset)?;
    if let Some(setpoint) = setpoint {
        config.initial.setpoint = setpoint;
    }
    if let Some(mode) = mode {
        config.initial.mode = mode;
    }

    let schedule = steps
        .iter()
        .map(|s| run_service::parse_step(s))
        .collect::<AppResult<Vec<_>>>()?;
    let request = RunRequest {
        config,
        options,
        schedule: CommandSchedule::new(schedule)?,
    };

    let response = run_service::run_offline(&request)?;
    let csv = response.record.to_csv();

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} samples to {}",
            response.record.samples.len(),
            path.display()
        );
    } else {
        io::stdout().write_all(csv.as_bytes())?;
    }

    let summary = &response.summary;
    eprintln!(
        "✓ {} ticks: level {:.2}, control {:.2}, SP {:.2} [{}] ({}) in {:.3}s",
        summary.steps,
        summary.final_level,
        summary.final_control,
        summary.final_setpoint,
        summary.final_mode,
        summary.status.label(),
        summary.wall_time_s
    );
    Ok(())
}

fn cmd_serve(config_path: Option<&Path>, preset: Preset, ticks: Option<u64>) -> AppResult<()> {
    let config = config_service::resolve_config(config_path, preset)?;
    let runtime = hf_app::compile_loop(&config)?;
    let mut service = UdpService::bind(runtime)?;

    println!(
        "UDP simulator listening on {}, telemetry to {}",
        service.link().command_addr()?,
        service.link().telemetry_peer()
    );
    tracing::debug!(name = %config.name, ?ticks, "serving");
    let shutdown = AtomicBool::new(false);
    service.run(ticks, &shutdown);

    let driver = service.driver();
    println!(
        "✓ Stopped after {} ticks at level {:.2}",
        service.ticks(),
        driver.level()
    );
    Ok(())
}

fn cmd_send(command: &str, to: &str) -> AppResult<()> {
    // Refuse locally what the simulator would discard anyway.
    let update = hf_link::parse_command(command)?;
    let link = OperatorLink::sender(parse_addr(to)?)?;
    link.send_command(&update)?;
    println!("✓ Sent {} to {}", hf_link::encode_command(&update), to);
    Ok(())
}

fn cmd_monitor(bind: &str, count: Option<usize>, timeout_s: f64) -> AppResult<()> {
    let timeout = Duration::try_from_secs_f64(timeout_s)
        .ok()
        .filter(|t| !t.is_zero())
        .ok_or_else(|| {
            AppError::InvalidInput("timeout must be a positive number of seconds".to_string())
        })?;
    let link = OperatorLink::bind(parse_addr(bind)?, parse_addr(DEFAULT_COMMAND_ADDR)?)?;
    println!("Listening for telemetry on {}", link.telemetry_addr()?);
    tracing::info!(bind, timeout_s, "monitor started");

    let mut received = 0usize;
    while count.is_none_or(|max| received < max) {
        match link.next_telemetry(timeout)? {
            Some(t) => {
                received += 1;
                println!("level {:>6.2}  control {:>6.2}", t.level, t.control);
            }
            None => {
                println!("No telemetry for {timeout_s} s, giving up");
                break;
            }
        }
    }
    println!("✓ Received {received} telemetry datagrams");
    Ok(())
}

fn cmd_config_init(path: &Path, preset: Preset) -> AppResult<()> {
    let config = config_service::init_config(path, preset)?;
    println!("✓ Wrote '{}' ({preset}) to {}", config.name, path.display());
    Ok(())
}

fn cmd_config_validate(path: &Path) -> AppResult<()> {
    println!("Validating config: {}", path.display());
    let config = config_service::validate_file(path)?;
    println!("✓ Config '{}' is valid", config.name);
    Ok(())
}
