use anyhow::{Context, Result};
use image::RgbaImage;

use crate::config::PlotConfig;
use crate::data::grid::coordinate_grid;
use crate::data::loader::{load_concentration_table, load_flux_table, load_reference_image};
use crate::data::mask::{apply_mask, threshold_mask};
use crate::data::model::{ConcentrationRow, CoordinateGrid, FluxRow, GridDims, Mask, MaskedField};
use crate::data::raster::{rasterize_concentration, rasterize_flux};

// ---------------------------------------------------------------------------
// FieldSet – everything the renderer needs
// ---------------------------------------------------------------------------

/// Masked fields and coordinates produced by one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    pub dims: GridDims,
    pub mask: Mask,
    pub concentration: MaskedField,
    pub flux_x: MaskedField,
    pub flux_y: MaskedField,
    pub flux_magnitude: MaskedField,
    pub grid: CoordinateGrid,
}

/// Rasterize both tables, mask by concentration and build the grid.
pub fn build_fields(
    flux: &[FluxRow],
    concentration: &[ConcentrationRow],
    dims: GridDims,
    tol: f64,
) -> Result<FieldSet> {
    let c = rasterize_concentration(concentration, dims).context("rasterizing concentration map")?;
    let (jx, jy) = rasterize_flux(flux, dims).context("rasterizing flux map")?;
    let magnitude = jx.zip_map(&jy, f64::hypot);

    let mask = threshold_mask(&c, tol);
    let masked = mask.masked_count();
    log::info!(
        "Grid {dims}: {masked} of {} cells masked (C < {tol:e})",
        dims.len()
    );

    let fields = FieldSet {
        dims,
        concentration: apply_mask(c, &mask),
        flux_x: apply_mask(jx, &mask),
        flux_y: apply_mask(jy, &mask),
        flux_magnitude: apply_mask(magnitude, &mask),
        grid: coordinate_grid(dims),
        mask,
    };

    match fields.concentration.range() {
        Some((lo, hi)) => log::info!("Concentration range [{lo:.4e}, {hi:.4e}]"),
        None => log::warn!("Every cell is masked; contour panels will be empty"),
    }
    if let Some((lo, hi)) = fields.flux_x.range() {
        log::info!("Jx range [{lo:.4e}, {hi:.4e}]");
    }

    Ok(fields)
}

/// Load every input named by `config` and build the fields.
pub fn run(config: &PlotConfig) -> Result<(FieldSet, RgbaImage)> {
    let flux = load_flux_table(&config.flux_table)
        .with_context(|| format!("loading flux map {}", config.flux_table.display()))?;
    let concentration = load_concentration_table(&config.concentration_table).with_context(|| {
        format!(
            "loading concentration map {}",
            config.concentration_table.display()
        )
    })?;
    let image = load_reference_image(&config.image)?;
    log::info!(
        "Reference image {} is {}x{}",
        config.image_name(),
        image.width(),
        image.height()
    );

    let fields = build_fields(&flux, &concentration, config.dims(), config.tol)?;
    Ok((fields, image))
}
