use std::path::Path;
use std::time::Duration;

use hf_app::{AppResult, LoopRuntime, LoopWorker, compile_loop, resolve_config};
use hf_config::Preset;
use hf_controls::Mode;
use hf_core::to_duration;
use hf_sim::{History, SetpointRange};

use crate::diagnostics::DiagnosticLog;
use crate::views::{ControlView, DiagnosticsView, MonitorView};

const DEFAULT_HISTORY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum View {
    #[default]
    Monitor,
    Control,
    Diagnostics,
}

impl View {
    const ALL: [View; 3] = [View::Monitor, View::Control, View::Diagnostics];

    fn title(self) -> &'static str {
        match self {
            View::Monitor => "Monitor",
            View::Control => "Control",
            View::Diagnostics => "Diagnostics",
        }
    }
}

pub struct HydraflowApp {
    worker: Option<LoopWorker>,
    history: History,
    view: View,
    mode: Mode,
    setpoint: f64,
    setpoint_range: SetpointRange,
    tolerance: f64,
    repaint_every: Duration,
    log: DiagnosticLog,
    monitor_view: MonitorView,
    control_view: ControlView,
    diagnostics_view: DiagnosticsView,
}

fn display_history(capacity: Option<usize>) -> History {
    History::bounded(capacity.unwrap_or(DEFAULT_HISTORY).max(1))
        .unwrap_or_else(|_| History::unbounded())
}

fn load_runtime(config_path: Option<&Path>) -> AppResult<LoopRuntime> {
    let config = resolve_config(config_path, Preset::Display)?;
    compile_loop(&config)
}

impl HydraflowApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config_path: Option<&Path>) -> Self {
        let mut app = Self {
            worker: None,
            history: display_history(None),
            view: View::default(),
            mode: Mode::default(),
            setpoint: 0.0,
            setpoint_range: SetpointRange::default(),
            tolerance: 0.5,
            repaint_every: Duration::from_millis(100),
            log: DiagnosticLog::default(),
            monitor_view: MonitorView,
            control_view: ControlView,
            diagnostics_view: DiagnosticsView,
        };

        match load_runtime(config_path).and_then(|runtime| app.start(runtime)) {
            Ok(()) => app.log.log("Simulation started (virtual mode)"),
            Err(e) => app.log.log(format!("Failed to start simulation: {e}")),
        }
        app
    }

    fn start(&mut self, runtime: LoopRuntime) -> AppResult<()> {
        let command = runtime.driver.command();
        self.mode = command.mode;
        self.setpoint = command.setpoint;
        self.setpoint_range = runtime.driver.setpoint_range();
        self.tolerance = runtime.setpoint_tolerance;
        self.repaint_every = to_duration(runtime.sample().period());
        self.log.log(format!("Loaded '{}'", runtime.name));

        let worker = LoopWorker::start(runtime.driver)?;
        self.history = display_history(Some(worker.capacity()));
        self.worker = Some(worker);
        Ok(())
    }

    fn poll_worker(&mut self) {
        let Some(worker) = &self.worker else {
            return;
        };
        for sample in worker.drain() {
            self.history.push(sample);
        }
        if !worker.is_running() {
            self.log.log("Simulation loop stopped unexpectedly");
            self.worker = None;
        }
    }

    fn push_mode(&mut self) {
        if let Some(worker) = &self.worker {
            worker.set_mode(self.mode);
        }
        self.log
            .log(format!("Control mode: {}", self.mode.description()));
    }

    fn push_setpoint(&mut self) {
        if let Some(worker) = &self.worker {
            worker.set_setpoint(self.setpoint);
        }
    }

    fn log_setpoint(&mut self) {
        if self.setpoint_range.contains(self.setpoint) {
            self.log.log(format!("Setpoint: {:.2} cm", self.setpoint));
        } else {
            self.log.log(format!(
                "Setpoint {:.2} cm outside {:.0}-{:.0} cm",
                self.setpoint, self.setpoint_range.min, self.setpoint_range.max
            ));
        }
    }
}

impl eframe::App for HydraflowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("System", |ui| {
                    for view in View::ALL {
                        if ui.button(view.title()).clicked() {
                            self.view = view;
                            ui.close_menu();
                        }
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Current view: {}", self.view.title()));
                ui.separator();
                ui.label(format!("Mode: {}", self.mode.description()));
                if self.worker.is_none() {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, "Simulation stopped");
                }
            });
        });

        let mut actions = None;
        egui::CentralPanel::default().show(ctx, |ui| match self.view {
            View::Monitor => {
                self.monitor_view
                    .show(ui, &self.history, self.setpoint, self.tolerance);
            }
            View::Control => {
                actions = Some(self.control_view.show(
                    ui,
                    &mut self.mode,
                    &mut self.setpoint,
                    self.setpoint_range,
                ));
            }
            View::Diagnostics => self.diagnostics_view.show(ui, &self.log),
        });

        if let Some(actions) = actions {
            if actions.mode_changed {
                self.push_mode();
            }
            if actions.setpoint_changed {
                self.push_setpoint();
            }
            if actions.setpoint_committed {
                self.log_setpoint();
            }
        }

        ctx.request_repaint_after(self.repaint_every);
    }
}
