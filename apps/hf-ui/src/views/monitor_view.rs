use egui::{Color32, RichText};
use egui_plot::{HLine, Legend, Line, Plot, PlotPoints};
use hf_sim::{ControlDirection, History, SetpointStatus};

#[derive(Default)]
pub struct MonitorView;

fn status_color(status: SetpointStatus) -> Color32 {
    match status {
        SetpointStatus::AtSetpoint => Color32::DARK_GREEN,
        SetpointStatus::NearSetpoint => Color32::from_rgb(40, 90, 220),
        SetpointStatus::OutOfRange => Color32::RED,
    }
}

impl MonitorView {
    pub fn show(&mut self, ui: &mut egui::Ui, history: &History, setpoint: f64, tolerance: f64) {
        ui.vertical_centered(|ui| ui.heading("Level Monitor"));
        ui.separator();

        let plot_height = ((ui.available_height() - 60.0) / 2.0).max(80.0);

        Plot::new("level_plot")
            .legend(Legend::default())
            .height(plot_height)
            .x_axis_label("Time [s]")
            .y_axis_label("Level [cm]")
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(PlotPoints::from(history.level_series())).name("Level"));
                plot_ui.hline(HLine::new(setpoint).name("Setpoint"));
            });

        Plot::new("control_plot")
            .legend(Legend::default())
            .height(plot_height)
            .x_axis_label("Time [s]")
            .y_axis_label("Control (u)")
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(history.control_series()))
                        .color(Color32::RED)
                        .name("Control"),
                );
            });

        ui.separator();
        match history.latest() {
            Some(latest) => {
                let status = SetpointStatus::classify(latest.level, setpoint, tolerance);
                ui.label(
                    RichText::new(format!("SP status: {}", status.label()))
                        .color(status_color(status))
                        .strong(),
                );
                let direction = ControlDirection::of(latest.control);
                ui.label(format!(
                    "Control u: {:.2} ({})",
                    latest.control,
                    direction.label()
                ));
            }
            None => {
                ui.label("SP status: --");
                ui.label("Control u: --");
            }
        }
    }
}
