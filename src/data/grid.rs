use super::model::{CoordinateGrid, Field, GridDims};

/// `n` evenly spaced samples from `start` to `stop`, both ends exact.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Build the normalised coordinate grid for `dims`.
///
/// `Xp` spans `[0, 1]` left to right. `Yp` spans `[aspect, 0]` top to
/// bottom, so row 0 sits at the top of the plot and shapes keep their
/// pixel proportions.
pub fn coordinate_grid(dims: GridDims) -> CoordinateGrid {
    let xs = linspace(0.0, 1.0, dims.x_size);
    let ys = linspace(dims.aspect(), 0.0, dims.y_size);

    CoordinateGrid {
        xp: Field::from_fn(dims, |_, col| xs[col]),
        yp: Field::from_fn(dims, |row, _| ys[row]),
    }
}

impl CoordinateGrid {
    /// Spacing between neighbouring cell centres along x and y.
    pub fn spacing(&self) -> (f64, f64) {
        let dims = self.xp.dims();
        let dx = if dims.x_size > 1 { 1.0 / (dims.x_size - 1) as f64 } else { 1.0 };
        let dy = if dims.y_size > 1 {
            dims.aspect() / (dims.y_size - 1) as f64
        } else {
            dims.aspect()
        };
        (dx, dy)
    }

    /// Nearest cell `(row, col)` to a physical point, if it lies on the grid.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let dims = self.xp.dims();
        let (dx, dy) = self.spacing();
        let col = (x / dx).round();
        let row = ((dims.aspect() - y) / dy).round();
        if col < 0.0 || row < 0.0 || col >= dims.x_size as f64 || row >= dims.y_size as f64 {
            return None;
        }
        Some((row as usize, col as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints_exact() {
        let v = linspace(0.0, 1.0, 863);
        assert_eq!(v.len(), 863);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[862], 1.0);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_grid_shape_and_ranges() {
        let dims = GridDims::new(863, 868);
        let grid = coordinate_grid(dims);

        assert_eq!(grid.xp.shape(), (868, 863));
        assert_eq!(grid.yp.shape(), (868, 863));
        assert_eq!(grid.xp.get(0, 0), 0.0);
        assert_eq!(grid.xp.get(0, 862), 1.0);
        assert_eq!(grid.yp.get(0, 0), 868.0 / 863.0);
        assert_eq!(grid.yp.get(867, 0), 0.0);
    }

    #[test]
    fn test_grid_monotonic() {
        let dims = GridDims::new(7, 5);
        let grid = coordinate_grid(dims);

        for row in 0..5 {
            for col in 1..7 {
                assert!(grid.xp.get(row, col) > grid.xp.get(row, col - 1));
            }
        }
        for col in 0..7 {
            for row in 1..5 {
                assert!(grid.yp.get(row, col) < grid.yp.get(row - 1, col));
            }
        }
    }

    #[test]
    fn test_cell_at_inverts_grid() {
        let dims = GridDims::new(10, 20);
        let grid = coordinate_grid(dims);
        let (x, y) = (grid.xp.get(13, 4), grid.yp.get(13, 4));
        assert_eq!(grid.cell_at(x, y), Some((13, 4)));
        assert_eq!(grid.cell_at(-0.5, 0.0), None);
        assert_eq!(grid.cell_at(0.0, 10.0), None);
    }
}
