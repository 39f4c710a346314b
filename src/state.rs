use crate::color::ColormapKind;
use crate::config::{FluxDisplay, PlotConfig};
use crate::data::model::MaskedField;
use crate::data::quiver::{QuiverArrow, sample_quiver};
use crate::pipeline::FieldSet;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Field value under the pointer in one of the contour panels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverReadout {
    pub quantity: &'static str,
    pub x: f64,
    pub y: f64,
    pub row: usize,
    pub col: usize,
    /// `None` when the cell is masked.
    pub value: Option<f64>,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: PlotConfig,
    pub fields: FieldSet,

    /// Which flux quantity the third panel shows.
    pub flux_display: FluxDisplay,

    /// Whether flux arrows are drawn over the flux panel.
    pub show_quiver: bool,

    /// Arrows sampled once at startup.
    pub quiver: Vec<QuiverArrow>,

    /// Last pointer readout, cleared when the pointer leaves the plots.
    pub hover: Option<HoverReadout>,
}

impl AppState {
    pub fn new(config: PlotConfig, fields: FieldSet) -> Self {
        let quiver = sample_quiver(&fields.flux_x, &fields.flux_y, &fields.grid, config.quiver_step);
        log::info!("Sampled {} flux arrows every {} cells", quiver.len(), config.quiver_step);

        Self {
            flux_display: config.flux_display,
            show_quiver: config.show_quiver,
            quiver,
            hover: None,
            config,
            fields,
        }
    }

    /// Field currently shown in the flux panel.
    pub fn flux_field(&self) -> &MaskedField {
        self.flux_field_for(self.flux_display)
    }

    pub fn flux_field_for(&self, mode: FluxDisplay) -> &MaskedField {
        match mode {
            FluxDisplay::Jx => &self.fields.flux_x,
            FluxDisplay::Magnitude => &self.fields.flux_magnitude,
        }
    }

    pub fn flux_colormap_for(&self, mode: FluxDisplay) -> ColormapKind {
        match mode {
            FluxDisplay::Jx => self.config.flux_colormap,
            FluxDisplay::Magnitude => self.config.flux_magnitude_colormap,
        }
    }

    /// Colour-bar label of the flux panel.
    pub fn flux_label(&self) -> &'static str {
        match self.flux_display {
            FluxDisplay::Jx => "Flux distribution",
            FluxDisplay::Magnitude => "Mass Flux",
        }
    }

    /// Resolve a pointer position in plot coordinates against `field`.
    pub fn readout(&self, quantity: &'static str, field: &MaskedField, x: f64, y: f64) -> Option<HoverReadout> {
        let (row, col) = self.fields.grid.cell_at(x, y)?;
        Some(HoverReadout {
            quantity,
            x,
            y,
            row,
            col,
            value: field.value(row, col),
        })
    }

    /// Arrows to draw this frame, if the overlay is on.
    pub fn visible_quiver(&self) -> Option<&[QuiverArrow]> {
        self.show_quiver.then_some(self.quiver.as_slice())
    }

    pub fn summary(&self) -> String {
        let dims = self.fields.dims;
        format!(
            "{dims} grid, {} of {} cells masked",
            self.fields.mask.masked_count(),
            dims.len()
        )
    }
}
