use std::fmt;

// ---------------------------------------------------------------------------
// Table rows – one line of the source CSV / Parquet / JSON
// ---------------------------------------------------------------------------

/// One row of the flux map: pixel coordinate plus both flux components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxRow {
    pub x: i64,
    pub y: i64,
    pub jx: f64,
    pub jy: f64,
}

/// One row of the concentration map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConcentrationRow {
    pub x: i64,
    pub y: i64,
    pub c: f64,
}

// ---------------------------------------------------------------------------
// GridDims – shape shared by every dense array
// ---------------------------------------------------------------------------

/// Grid size in cells. Arrays are `y_size` rows by `x_size` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub x_size: usize,
    pub y_size: usize,
}

impl GridDims {
    pub fn new(x_size: usize, y_size: usize) -> Self {
        Self { x_size, y_size }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.x_size * self.y_size
    }

    /// Physical height when the width is normalised to 1.
    pub fn aspect(&self) -> f64 {
        self.y_size as f64 / self.x_size as f64
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x_size, self.y_size)
    }
}

// ---------------------------------------------------------------------------
// Field – dense row-major scalar array
// ---------------------------------------------------------------------------

/// A dense 2D array of one scalar quantity, indexed `(row, col) = (y, x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    dims: GridDims,
    data: Vec<f64>,
}

impl Field {
    /// A field with every cell set to zero.
    pub fn zeros(dims: GridDims) -> Self {
        Self {
            dims,
            data: vec![0.0; dims.len()],
        }
    }

    /// Build a field by evaluating `f(row, col)` for every cell.
    pub fn from_fn(dims: GridDims, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(dims.len());
        for row in 0..dims.y_size {
            for col in 0..dims.x_size {
                data.push(f(row, col));
            }
        }
        Self { dims, data }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// `(rows, cols)`, i.e. `(y_size, x_size)`.
    #[cfg(test)]
    pub fn shape(&self) -> (usize, usize) {
        (self.dims.y_size, self.dims.x_size)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.dims.x_size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let idx = row * self.dims.x_size + col;
        self.data[idx] = value;
    }

    /// Row-major view of every cell.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Combine two fields of the same shape cell by cell.
    pub fn zip_map(&self, other: &Field, f: impl Fn(f64, f64) -> f64) -> Field {
        debug_assert_eq!(self.dims, other.dims);
        Field {
            dims: self.dims,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Mask – cells excluded from rendering
// ---------------------------------------------------------------------------

/// Boolean exclusion mask. `true` means "no data".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    dims: GridDims,
    data: Vec<bool>,
}

impl Mask {
    pub(crate) fn from_vec(dims: GridDims, data: Vec<bool>) -> Self {
        debug_assert_eq!(dims.len(), data.len());
        Self { dims, data }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    #[cfg(test)]
    pub fn shape(&self) -> (usize, usize) {
        (self.dims.y_size, self.dims.x_size)
    }

    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        self.data[row * self.dims.x_size + col]
    }

    pub fn values(&self) -> &[bool] {
        &self.data
    }

    /// Number of excluded cells.
    pub fn masked_count(&self) -> usize {
        self.data.iter().filter(|&&m| m).count()
    }
}

// ---------------------------------------------------------------------------
// MaskedField – a field paired with the shared exclusion mask
// ---------------------------------------------------------------------------

/// A field whose masked cells keep their value but are hidden from
/// rendering and from the colour-scale range.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedField {
    field: Field,
    mask: Mask,
}

impl MaskedField {
    pub(crate) fn new(field: Field, mask: Mask) -> Self {
        debug_assert_eq!(field.dims(), mask.dims());
        Self { field, mask }
    }

    pub fn dims(&self) -> GridDims {
        self.field.dims()
    }

    /// The underlying field, masked cells included.
    pub fn raw(&self) -> &Field {
        &self.field
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Cell value, or `None` when the cell is masked.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        if self.mask.is_masked(row, col) {
            None
        } else {
            Some(self.field.get(row, col))
        }
    }

    /// Iterate the values of unmasked cells in row-major order.
    pub fn unmasked_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.field
            .values()
            .iter()
            .zip(self.mask.values())
            .filter(|(_, &m)| !m)
            .map(|(&v, _)| v)
    }

    /// `(min, max)` over unmasked, finite cells. `None` if nothing is left.
    pub fn range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in self.unmasked_values().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        if min.is_finite() && max.is_finite() {
            Some((min, max))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// CoordinateGrid – normalised physical coordinates per cell
// ---------------------------------------------------------------------------

/// `Xp`/`Yp` meshgrid. Width is normalised to 1 and `Yp` runs from the
/// aspect ratio at row 0 down to 0 at the last row.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGrid {
    pub xp: Field,
    pub yp: Field,
}
