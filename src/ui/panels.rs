use eframe::egui::{self, RichText, Ui};

use crate::config::FluxDisplay;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                ui.close_menu();
            }
        });

        ui.menu_button("View", |ui: &mut Ui| {
            ui.strong("Flux panel");
            let before = state.flux_display;
            ui.radio_value(&mut state.flux_display, FluxDisplay::Jx, "Jx");
            ui.radio_value(&mut state.flux_display, FluxDisplay::Magnitude, "|J| magnitude");
            if state.flux_display != before {
                log::info!("Flux panel now shows {:?}", state.flux_display);
            }
            ui.separator();
            ui.checkbox(
                &mut state.show_quiver,
                format!("Quiver overlay (every {} cells)", state.config.quiver_step),
            );
        });

        ui.separator();
        ui.label(state.summary());

        if let Some(h) = &state.hover {
            ui.separator();
            let value = match h.value {
                Some(v) => format!("{v:.4e}"),
                None => "masked".to_owned(),
            };
            ui.label(
                RichText::new(format!(
                    "x={:.3}, y={:.3} [{}, {}]  {} = {value}",
                    h.x, h.y, h.row, h.col, h.quantity
                ))
                .monospace(),
            );
        }
    });
}
