use super::DataError;
use super::model::{ConcentrationRow, Field, FluxRow, GridDims};

// ---------------------------------------------------------------------------
// Rasterization: sparse rows → dense fields
// ---------------------------------------------------------------------------

/// Validate a row's coordinate and turn it into `(row, col)` indices.
fn cell_index(row_no: usize, x: i64, y: i64, dims: GridDims) -> Result<(usize, usize), DataError> {
    let in_range = x >= 0 && y >= 0 && (x as usize) < dims.x_size && (y as usize) < dims.y_size;
    if !in_range {
        return Err(DataError::OutOfBounds {
            row: row_no,
            x,
            y,
            dims,
        });
    }
    Ok((y as usize, x as usize))
}

/// Scatter concentration rows into a `y_size × x_size` field.
///
/// Later rows overwrite earlier ones at the same cell; cells no row touches
/// stay zero.
pub fn rasterize_concentration(rows: &[ConcentrationRow], dims: GridDims) -> Result<Field, DataError> {
    let mut c = Field::zeros(dims);
    let mut written = vec![false; dims.len()];
    let mut duplicates = 0usize;

    for (row_no, r) in rows.iter().enumerate() {
        let (row, col) = cell_index(row_no, r.x, r.y, dims)?;
        let idx = row * dims.x_size + col;
        if written[idx] {
            duplicates += 1;
        }
        written[idx] = true;
        c.set(row, col, r.c);
    }

    if duplicates > 0 {
        log::debug!("concentration table: {duplicates} rows overwrote an earlier value");
    }
    Ok(c)
}

/// Scatter flux rows into `(Jx, Jy)` fields with the same policy as
/// [`rasterize_concentration`].
pub fn rasterize_flux(rows: &[FluxRow], dims: GridDims) -> Result<(Field, Field), DataError> {
    let mut jx = Field::zeros(dims);
    let mut jy = Field::zeros(dims);
    let mut written = vec![false; dims.len()];
    let mut duplicates = 0usize;

    for (row_no, r) in rows.iter().enumerate() {
        let (row, col) = cell_index(row_no, r.x, r.y, dims)?;
        let idx = row * dims.x_size + col;
        if written[idx] {
            duplicates += 1;
        }
        written[idx] = true;
        jx.set(row, col, r.jx);
        jy.set(row, col, r.jy);
    }

    if duplicates > 0 {
        log::debug!("flux table: {duplicates} rows overwrote an earlier value");
    }
    Ok((jx, jy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conc(x: i64, y: i64, c: f64) -> ConcentrationRow {
        ConcentrationRow { x, y, c }
    }

    #[test]
    fn test_every_row_lands_at_its_cell() {
        let dims = GridDims::new(4, 3);
        let rows = vec![conc(0, 0, 1.0), conc(3, 2, 2.0), conc(1, 2, 3.0)];
        let c = rasterize_concentration(&rows, dims).unwrap();

        for r in &rows {
            assert_eq!(c.get(r.y as usize, r.x as usize), r.c);
        }
        assert_eq!(c.shape(), (3, 4));
    }

    #[test]
    fn test_last_write_wins() {
        let dims = GridDims::new(2, 2);
        let rows = vec![conc(1, 0, 1.0), conc(1, 0, 5.0)];
        let c = rasterize_concentration(&rows, dims).unwrap();
        assert_eq!(c.get(0, 1), 5.0);
    }

    #[test]
    fn test_untouched_cells_are_zero() {
        let dims = GridDims::new(3, 3);
        let c = rasterize_concentration(&[conc(1, 1, 4.0)], dims).unwrap();
        let nonzero = c.values().iter().filter(|&&v| v != 0.0).count();
        assert_eq!(nonzero, 1);
        assert_eq!(c.get(0, 0), 0.0);
    }

    #[test]
    fn test_full_size_scenario() {
        let dims = GridDims::new(863, 868);
        let c = rasterize_concentration(&[conc(5, 10, 0.5)], dims).unwrap();
        assert_eq!(c.get(10, 5), 0.5);
        assert_eq!(c.shape(), (868, 863));
    }

    #[test]
    fn test_flux_components_share_coordinates() {
        let dims = GridDims::new(3, 2);
        let rows = vec![
            FluxRow { x: 2, y: 1, jx: 0.25, jy: -0.5 },
            FluxRow { x: 0, y: 0, jx: 1.0, jy: 2.0 },
        ];
        let (jx, jy) = rasterize_flux(&rows, dims).unwrap();
        assert_eq!(jx.get(1, 2), 0.25);
        assert_eq!(jy.get(1, 2), -0.5);
        assert_eq!(jx.get(0, 0), 1.0);
        assert_eq!(jy.get(0, 0), 2.0);
    }

    #[test]
    fn test_out_of_range_coordinate_is_reported() {
        let dims = GridDims::new(3, 3);
        let err = rasterize_concentration(&[conc(0, 0, 1.0), conc(3, 1, 1.0)], dims).unwrap_err();
        assert_eq!(
            err,
            DataError::OutOfBounds {
                row: 1,
                x: 3,
                y: 1,
                dims
            }
        );

        let err = rasterize_flux(&[FluxRow { x: -1, y: 0, jx: 0.0, jy: 0.0 }], dims).unwrap_err();
        assert!(matches!(err, DataError::OutOfBounds { x: -1, .. }));
    }
}
