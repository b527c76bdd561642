use crate::diagnostics::DiagnosticLog;

#[derive(Default)]
pub struct DiagnosticsView;

impl DiagnosticsView {
    pub fn show(&mut self, ui: &mut egui::Ui, log: &DiagnosticLog) {
        ui.vertical_centered(|ui| ui.heading("Diagnostics"));
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in log.entries() {
                    ui.monospace(line);
                }
            });
    }
}
