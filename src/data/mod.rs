/// Data layer: core types, loading, rasterization and masking.
///
/// Architecture:
/// ```text
///  FMap / CMap  (.csv / .tsv / .json / .parquet)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse tables → FluxRow / ConcentrationRow
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  raster   │  scatter rows → dense C, Jx, Jy fields
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   mask    │  C < tol → shared exclusion mask → MaskedField
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ contour / quiver  │  levels, bands, arrows for the renderer
///   └──────────────────┘
/// ```

pub mod contour;
pub mod grid;
pub mod loader;
pub mod mask;
pub mod model;
pub mod quiver;
pub mod raster;

use thiserror::Error;

/// Domain failures surfaced while turning input files into fields.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("{table}: missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("row {row}: cell (x={x}, y={y}) lies outside the {dims} grid")]
    OutOfBounds {
        row: usize,
        x: i64,
        y: i64,
        dims: model::GridDims,
    },

    #[error("row {row}: coordinate {axis}={value} is not a finite number")]
    NonFiniteCoordinate { row: usize, axis: char, value: f64 },

    #[error("unsupported table extension: .{0}")]
    UnsupportedFormat(String),
}
