use super::model::{Field, Mask, MaskedField};

// ---------------------------------------------------------------------------
// Threshold masking
// ---------------------------------------------------------------------------

/// Mark every cell whose concentration is below `tol` as "no data".
pub fn threshold_mask(concentration: &Field, tol: f64) -> Mask {
    let data = concentration.values().iter().map(|&c| c < tol).collect();
    Mask::from_vec(concentration.dims(), data)
}

/// Attach `mask` to `field`. Values are kept; only visibility changes.
pub fn apply_mask(field: Field, mask: &Mask) -> MaskedField {
    MaskedField::new(field, mask.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::GridDims;

    #[test]
    fn test_mask_matches_threshold_everywhere() {
        let dims = GridDims::new(4, 3);
        let c = Field::from_fn(dims, |r, col| (r as f64 - 1.0) * col as f64);
        let tol = 1e-9;
        let mask = threshold_mask(&c, tol);

        assert_eq!(mask.shape(), c.shape());
        for row in 0..3 {
            for col in 0..4 {
                assert_eq!(mask.is_masked(row, col), c.get(row, col) < tol);
            }
        }
    }

    #[test]
    fn test_zero_cell_is_masked() {
        let dims = GridDims::new(2, 2);
        let mut c = Field::zeros(dims);
        c.set(0, 0, 0.5);
        let mask = threshold_mask(&c, 1e-9);

        assert!(!mask.is_masked(0, 0));
        assert!(mask.is_masked(1, 1));
        assert_eq!(mask.masked_count(), 3);
    }

    #[test]
    fn test_value_equal_to_tolerance_is_kept() {
        let dims = GridDims::new(1, 1);
        let c = Field::from_fn(dims, |_, _| 0.1);
        assert!(!threshold_mask(&c, 0.1).is_masked(0, 0));
    }

    #[test]
    fn test_apply_mask_keeps_underlying_values() {
        let dims = GridDims::new(2, 1);
        let c = Field::from_fn(dims, |_, col| col as f64);
        let jx = Field::from_fn(dims, |_, _| 3.0);
        let mask = threshold_mask(&c, 0.5);
        let jx = apply_mask(jx, &mask);

        assert_eq!(jx.value(0, 0), None);
        assert_eq!(jx.raw().get(0, 0), 3.0);
        assert_eq!(jx.value(0, 1), Some(3.0));
        assert_eq!(jx.mask(), &mask);
    }
}
