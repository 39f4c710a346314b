use super::model::{CoordinateGrid, MaskedField};

/// One flux arrow in physical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuiverArrow {
    pub origin: [f64; 2],
    pub tip: [f64; 2],
}

/// Sample `(Jx, Jy)` every `step` cells and scale so the longest arrow
/// covers 90 % of one sample spacing. Masked cells are skipped.
pub fn sample_quiver(
    jx: &MaskedField,
    jy: &MaskedField,
    grid: &CoordinateGrid,
    step: usize,
) -> Vec<QuiverArrow> {
    let step = step.max(1);
    let dims = jx.dims();

    let mut samples = Vec::new();
    for row in (0..dims.y_size).step_by(step) {
        for col in (0..dims.x_size).step_by(step) {
            let (Some(u), Some(v)) = (jx.value(row, col), jy.value(row, col)) else {
                continue;
            };
            if !(u.is_finite() && v.is_finite()) {
                continue;
            }
            samples.push((row, col, u, v));
        }
    }

    let longest = samples
        .iter()
        .map(|&(_, _, u, v)| u.hypot(v))
        .fold(0.0_f64, f64::max);
    if longest <= 0.0 {
        return Vec::new();
    }

    let (dx, dy) = grid.spacing();
    let scale = 0.9 * step as f64 * dx.min(dy) / longest;

    samples
        .into_iter()
        .map(|(row, col, u, v)| {
            let x = grid.xp.get(row, col);
            let y = grid.yp.get(row, col);
            QuiverArrow {
                origin: [x, y],
                tip: [x + u * scale, y + v * scale],
            }
        })
        .collect()
}
