use eframe::egui::{self, TextureHandle};
use egui_extras::{Size, StripBuilder};
use image::RgbaImage;

use crate::config::FluxDisplay;
use crate::state::AppState;
use crate::ui::plot::{ContourPanel, contour_panel, reference_panel, reference_texture};
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FluxContourApp {
    pub state: AppState,
    reference: TextureHandle,
    concentration: ContourPanel,
    flux_x: ContourPanel,
    flux_magnitude: ContourPanel,
}

impl FluxContourApp {
    /// Upload every texture once; frames only draw them.
    pub fn new(ctx: &egui::Context, state: AppState, image: &RgbaImage) -> Self {
        let levels = state.config.contour_levels;
        let fields = &state.fields;

        let reference = reference_texture(ctx, "reference", image);
        let concentration = ContourPanel::new(
            ctx,
            "concentration",
            &fields.concentration,
            levels,
            state.config.concentration_colormap,
        );
        let flux_panel = |id: &'static str, mode: FluxDisplay| {
            ContourPanel::new(
                ctx,
                id,
                state.flux_field_for(mode),
                levels,
                state.flux_colormap_for(mode),
            )
        };
        let flux_x = flux_panel("flux_x", FluxDisplay::Jx);
        let flux_magnitude = flux_panel("flux_magnitude", FluxDisplay::Magnitude);

        Self {
            state,
            reference,
            concentration,
            flux_x,
            flux_magnitude,
        }
    }
}

impl eframe::App for FluxContourApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: image | concentration | flux ----
        let title = self.state.config.image_name();
        let flux_panel = match self.state.flux_display {
            FluxDisplay::Jx => &self.flux_x,
            FluxDisplay::Magnitude => &self.flux_magnitude,
        };

        let mut hover = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            StripBuilder::new(ui)
                .sizes(Size::remainder(), 3)
                .horizontal(|mut strip| {
                    strip.cell(|ui| {
                        reference_panel(ui, &title, &self.reference);
                    });
                    strip.cell(|ui| {
                        let state = &self.state;
                        if let Some([x, y]) = contour_panel(
                            ui,
                            &self.concentration,
                            "Concentration Distribution",
                            &state.fields.grid,
                            None,
                        ) {
                            hover = state.readout("C", &state.fields.concentration, x, y);
                        }
                    });
                    strip.cell(|ui| {
                        let state = &self.state;
                        if let Some([x, y]) = contour_panel(
                            ui,
                            flux_panel,
                            state.flux_label(),
                            &state.fields.grid,
                            state.visible_quiver(),
                        ) {
                            let quantity = match state.flux_display {
                                FluxDisplay::Jx => "Jx",
                                FluxDisplay::Magnitude => "|J|",
                            };
                            hover = state.readout(quantity, state.flux_field(), x, y);
                        }
                    });
                });
        });
        self.state.hover = hover;
    }
}
