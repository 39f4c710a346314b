use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::color::ColormapKind;
use crate::data::model::GridDims;

/// File looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "flux-contour.json";

/// What the third panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FluxDisplay {
    /// The x component of the flux.
    Jx,
    /// `sqrt(Jx² + Jy²)`.
    Magnitude,
}

// ---------------------------------------------------------------------------
// PlotConfig
// ---------------------------------------------------------------------------

/// Run constants. Every key is optional in the JSON file; missing keys keep
/// their defaults. Unknown keys are an error so a misspelt override is not
/// silently ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    pub x_size: usize,
    pub y_size: usize,
    /// Cells with concentration below this are masked.
    pub tol: f64,
    pub image: PathBuf,
    pub flux_table: PathBuf,
    pub concentration_table: PathBuf,
    pub contour_levels: usize,
    pub concentration_colormap: ColormapKind,
    pub flux_colormap: ColormapKind,
    pub flux_magnitude_colormap: ColormapKind,
    pub flux_display: FluxDisplay,
    pub quiver_step: usize,
    pub show_quiver: bool,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            x_size: 863,
            y_size: 868,
            tol: 1e-9,
            image: PathBuf::from("Cycled_SC811.jpg"),
            flux_table: PathBuf::from("Cycled_SC811_FMap.csv"),
            concentration_table: PathBuf::from("Cycled_SC811_CMap.csv"),
            contour_levels: 40,
            concentration_colormap: ColormapKind::Inferno,
            flux_colormap: ColormapKind::Inferno,
            flux_magnitude_colormap: ColormapKind::Rainbow,
            flux_display: FluxDisplay::Jx,
            quiver_step: 100,
            show_quiver: false,
            window_size: [800.0, 400.0],
        }
    }
}

impl PlotConfig {
    /// Read `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!("{} not found, using built-in defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: PlotConfig =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.x_size == 0 || self.y_size == 0 {
            bail!("grid dimensions must be non-zero, got {}x{}", self.x_size, self.y_size);
        }
        if self.contour_levels == 0 {
            bail!("contour_levels must be at least 1");
        }
        if self.quiver_step == 0 {
            bail!("quiver_step must be at least 1");
        }
        if !self.tol.is_finite() {
            bail!("tol must be finite, got {}", self.tol);
        }
        Ok(())
    }

    pub fn dims(&self) -> GridDims {
        GridDims::new(self.x_size, self.y_size)
    }

    /// Display name of the reference image (its file name).
    pub fn image_name(&self) -> String {
        self.image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.image.display().to_string())
    }
}
