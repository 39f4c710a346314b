//! Filled-contour banding.
//!
//! A filled contour plot partitions the value range of a field into
//! `count` bands bounded by evenly spaced levels and paints each cell with
//! the colour of the band its value falls into.

use super::model::MaskedField;

// ---------------------------------------------------------------------------
// ContourLevels
// ---------------------------------------------------------------------------

/// Band boundaries for one masked field.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLevels {
    /// `bands + 1` ascending boundaries, or empty when nothing is unmasked.
    boundaries: Vec<f64>,
}

impl ContourLevels {
    /// Split the unmasked value range into `count` equal bands.
    ///
    /// A flat field collapses to one band; a fully masked field has none.
    pub fn new(field: &MaskedField, count: usize) -> Self {
        let Some((min, max)) = field.range() else {
            return Self { boundaries: Vec::new() };
        };
        if count == 0 {
            return Self { boundaries: Vec::new() };
        }
        if (max - min).abs() <= f64::EPSILON * max.abs().max(1.0) {
            return Self {
                boundaries: vec![min, max],
            };
        }
        let step = (max - min) / count as f64;
        let boundaries = (0..=count)
            .map(|i| if i == count { max } else { min + step * i as f64 })
            .collect();
        Self { boundaries }
    }

    #[cfg(test)]
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Number of bands (one less than the number of boundaries).
    pub fn band_count(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.band_count() == 0
    }

    /// `(min, max)` covered by the bands.
    pub fn range(&self) -> Option<(f64, f64)> {
        Some((*self.boundaries.first()?, *self.boundaries.last()?))
    }

    /// Band index for `value`, clamped to the outermost bands.
    /// The maximum value belongs to the last band.
    pub fn band_of(&self, value: f64) -> Option<usize> {
        let bands = self.band_count();
        if bands == 0 || !value.is_finite() {
            return None;
        }
        let (min, max) = self.range()?;
        if bands == 1 || max <= min {
            return Some(0);
        }
        let t = (value - min) / (max - min);
        let idx = (t * bands as f64).floor();
        Some((idx.max(0.0) as usize).min(bands - 1))
    }

    /// Position of band `idx` along the colour map, from 0 to 1.
    pub fn band_position(&self, idx: usize) -> f32 {
        let bands = self.band_count();
        if bands <= 1 {
            0.0
        } else {
            idx as f32 / (bands - 1) as f32
        }
    }
}

// ---------------------------------------------------------------------------
// ContourFill – per-cell band assignment
// ---------------------------------------------------------------------------

/// Band index per cell in row-major order; `None` marks masked cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourFill {
    pub width: usize,
    pub height: usize,
    pub levels: ContourLevels,
    pub bands: Vec<Option<usize>>,
}

impl ContourFill {
    pub fn new(field: &MaskedField, level_count: usize) -> Self {
        let levels = ContourLevels::new(field, level_count);
        let dims = field.dims();
        let bands = field
            .raw()
            .values()
            .iter()
            .zip(field.mask().values())
            .map(|(&v, &masked)| if masked { None } else { levels.band_of(v) })
            .collect();

        Self {
            width: dims.x_size,
            height: dims.y_size,
            levels,
            bands,
        }
    }

    /// Number of cells that received a band.
    pub fn filled_count(&self) -> usize {
        self.bands.iter().filter(|b| b.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::mask::{apply_mask, threshold_mask};
    use crate::data::model::{Field, GridDims};

    fn masked(dims: GridDims, values: Vec<f64>, tol: f64) -> MaskedField {
        let field = Field::from_fn(dims, |r, c| values[r * dims.x_size + c]);
        let mask = threshold_mask(&field, tol);
        apply_mask(field, &mask)
    }

    #[test]
    fn test_forty_bands_span_unmasked_range() {
        let dims = GridDims::new(4, 1);
        let f = masked(dims, vec![0.0, 1.0, 3.0, 5.0], 1e-9);
        let levels = ContourLevels::new(&f, 40);

        assert_eq!(levels.band_count(), 40);
        assert_eq!(levels.boundaries().len(), 41);
        assert_eq!(levels.range(), Some((1.0, 5.0)));
    }

    #[test]
    fn test_band_of_edges() {
        let dims = GridDims::new(2, 1);
        let f = masked(dims, vec![1.0, 5.0], 0.0);
        let levels = ContourLevels::new(&f, 4);

        assert_eq!(levels.band_of(1.0), Some(0));
        assert_eq!(levels.band_of(2.0), Some(1));
        assert_eq!(levels.band_of(4.99), Some(3));
        assert_eq!(levels.band_of(5.0), Some(3));
        assert_eq!(levels.band_of(-10.0), Some(0));
        assert_eq!(levels.band_of(f64::NAN), None);
    }

    #[test]
    fn test_flat_field_has_single_band() {
        let dims = GridDims::new(3, 1);
        let f = masked(dims, vec![2.0; 3], 1e-9);
        let levels = ContourLevels::new(&f, 40);
        assert_eq!(levels.band_count(), 1);
        assert!(!levels.is_empty());
        assert_eq!(levels.band_of(2.0), Some(0));
        assert_eq!(levels.band_position(0), 0.0);
    }

    #[test]
    fn test_all_masked_field_has_no_levels() {
        let dims = GridDims::new(2, 2);
        let f = masked(dims, vec![0.0; 4], 1e-9);
        let fill = ContourFill::new(&f, 40);
        assert!(fill.levels.is_empty());
        assert_eq!(fill.filled_count(), 0);
    }

    #[test]
    fn test_fill_leaves_masked_cells_empty() {
        let dims = GridDims::new(3, 1);
        let f = masked(dims, vec![0.0, 1.0, 2.0], 1e-9);
        let fill = ContourFill::new(&f, 2);

        assert_eq!(fill.bands, vec![None, Some(0), Some(1)]);
        assert_eq!((fill.width, fill.height), (3, 1));
    }
}
