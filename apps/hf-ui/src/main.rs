#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod diagnostics;
mod views;

use std::path::PathBuf;

use app::HydraflowApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional config file; the display preset otherwise.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_title("HydraFlow - Level Control (Simulation)"),
        ..Default::default()
    };

    eframe::run_native(
        "HydraFlow",
        options,
        Box::new(move |cc| Ok(Box::new(HydraflowApp::new(cc, config_path.as_deref())))),
    )
}
