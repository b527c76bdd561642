use hf_controls::Mode;
use hf_sim::SetpointRange;

#[derive(Default)]
pub struct ControlView;

/// What the operator changed this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlActions {
    pub mode_changed: bool,
    pub setpoint_changed: bool,
    /// Drag released or text entry finished.
    pub setpoint_committed: bool,
}

impl ControlView {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        mode: &mut Mode,
        setpoint: &mut f64,
        range: SetpointRange,
    ) -> ControlActions {
        let mut actions = ControlActions::default();

        ui.vertical_centered(|ui| ui.heading("System Control"));
        ui.separator();

        ui.label("Control mode");
        for choice in [Mode::Pid, Mode::GainScheduled] {
            if ui.radio_value(mode, choice, choice.description()).changed() {
                actions.mode_changed = true;
            }
        }

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label("Setpoint [cm]");
            let response = ui.add(egui::DragValue::new(setpoint).speed(0.1).max_decimals(2));
            actions.setpoint_changed = response.changed();
            actions.setpoint_committed = response.drag_stopped() || response.lost_focus();
        });

        if !range.contains(*setpoint) {
            ui.colored_label(
                egui::Color32::from_rgb(200, 120, 0),
                format!(
                    "Outside recommended range {:.0}-{:.0} cm",
                    range.min, range.max
                ),
            );
        }

        actions
    }
}
