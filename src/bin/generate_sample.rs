//! Writes a synthetic input set (CMap, FMap, reference image) matching the
//! default configuration, so the viewer has something to open.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use image::{Rgb, RgbImage};
use parquet::arrow::ArrowWriter;

const X_SIZE: usize = 863;
const Y_SIZE: usize = 868;
const PORE_COUNT: usize = 60;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Solid particle blocking transport.
struct Pore {
    cx: f64,
    cy: f64,
    r: f64,
}

/// One pixel of the synthetic sample.
struct Cell {
    x: i64,
    y: i64,
    c: f64,
    jx: f64,
    jy: f64,
}

/// Concentration falls linearly from left (1) to right (0) inside a disk;
/// flux is `-∇C` scaled, zero inside solid particles.
fn build_cells(pores: &[Pore]) -> Vec<Cell> {
    let cx = X_SIZE as f64 / 2.0;
    let cy = Y_SIZE as f64 / 2.0;
    let radius = 0.45 * X_SIZE.min(Y_SIZE) as f64;

    let mut cells = Vec::new();
    for y in 0..Y_SIZE {
        for x in 0..X_SIZE {
            let (fx, fy) = (x as f64, y as f64);
            if (fx - cx).hypot(fy - cy) > radius {
                continue;
            }
            let solid = pores.iter().any(|p| (fx - p.cx).hypot(fy - p.cy) < p.r);
            let (c, jx, jy) = if solid {
                (0.0, 0.0, 0.0)
            } else {
                let t = (fx - (cx - radius)) / (2.0 * radius);
                let c = (1.0 - t).clamp(1e-6, 1.0);
                // Bend the flux around the disk centre a little so Jy is non-zero.
                let swirl = (fy - cy) / radius;
                (c, 1.0 / (2.0 * radius), -0.2 * swirl / (2.0 * radius))
            };
            cells.push(Cell {
                x: x as i64,
                y: y as i64,
                c,
                jx,
                jy,
            });
        }
    }
    cells
}

fn write_csvs(cells: &[Cell], cmap: &str, fmap: &str) -> Result<()> {
    let mut c_writer = csv::Writer::from_path(cmap).with_context(|| format!("creating {cmap}"))?;
    c_writer.write_record(["x", "y", "C"])?;
    let mut f_writer = csv::Writer::from_path(fmap).with_context(|| format!("creating {fmap}"))?;
    f_writer.write_record(["x", "y", "Jx", "Jy"])?;

    for cell in cells {
        c_writer.write_record(&[cell.x.to_string(), cell.y.to_string(), cell.c.to_string()])?;
        f_writer.write_record(&[
            cell.x.to_string(),
            cell.y.to_string(),
            cell.jx.to_string(),
            cell.jy.to_string(),
        ])?;
    }
    c_writer.flush()?;
    f_writer.flush()?;
    Ok(())
}

fn write_flux_parquet(cells: &[Cell], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::Int64, false),
        Field::new("y", DataType::Int64, false),
        Field::new("Jx", DataType::Float64, false),
        Field::new("Jy", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(cells.iter().map(|c| c.x))),
            Arc::new(Int64Array::from_iter_values(cells.iter().map(|c| c.y))),
            Arc::new(Float64Array::from_iter_values(cells.iter().map(|c| c.jx))),
            Arc::new(Float64Array::from_iter_values(cells.iter().map(|c| c.jy))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Grey disk on black with darker solid particles, like a micrograph.
fn write_image(pores: &[Pore], path: &str) -> Result<()> {
    let cx = X_SIZE as f64 / 2.0;
    let cy = Y_SIZE as f64 / 2.0;
    let radius = 0.45 * X_SIZE.min(Y_SIZE) as f64;

    let img = RgbImage::from_fn(X_SIZE as u32, Y_SIZE as u32, |x, y| {
        let (fx, fy) = (x as f64, y as f64);
        if (fx - cx).hypot(fy - cy) > radius {
            Rgb([0, 0, 0])
        } else if pores.iter().any(|p| (fx - p.cx).hypot(fy - p.cy) < p.r) {
            Rgb([60, 60, 60])
        } else {
            Rgb([200, 200, 200])
        }
    });
    img.save(path).with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let pores: Vec<Pore> = (0..PORE_COUNT)
        .map(|_| Pore {
            cx: rng.next_f64() * X_SIZE as f64,
            cy: rng.next_f64() * Y_SIZE as f64,
            r: 8.0 + rng.next_f64() * 30.0,
        })
        .collect();

    let cells = build_cells(&pores);
    log::info!("Generated {} cells", cells.len());

    write_csvs(&cells, "Cycled_SC811_CMap.csv", "Cycled_SC811_FMap.csv")?;
    write_flux_parquet(&cells, "Cycled_SC811_FMap.parquet")?;
    write_image(&pores, "Cycled_SC811.jpg")?;

    println!(
        "Wrote {} rows to Cycled_SC811_CMap.csv / Cycled_SC811_FMap.csv / Cycled_SC811_FMap.parquet \
         and a {X_SIZE}x{Y_SIZE} reference image to Cycled_SC811.jpg",
        cells.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, ImageReader};
    use tempfile::TempDir;

    fn pores() -> Vec<Pore> {
        vec![Pore {
            cx: X_SIZE as f64 / 2.0,
            cy: Y_SIZE as f64 / 2.0,
            r: 20.0,
        }]
    }

    #[test]
    fn test_reference_image_is_jpeg_at_grid_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Cycled_SC811.jpg");
        write_image(&pores(), path.to_str().unwrap()).unwrap();

        let reader = ImageReader::open(&path).unwrap().with_guessed_format().unwrap();
        assert_eq!(reader.format(), Some(ImageFormat::Jpeg));
        let img = reader.decode().unwrap();
        assert_eq!((img.width(), img.height()), (X_SIZE as u32, Y_SIZE as u32));
    }

    #[test]
    fn test_cells_stay_inside_grid_and_solids_carry_no_flux() {
        let cells = build_cells(&pores());
        assert!(!cells.is_empty());
        assert!(cells.iter().all(|c| (0..X_SIZE as i64).contains(&c.x) && (0..Y_SIZE as i64).contains(&c.y)));

        let centre = cells
            .iter()
            .find(|c| c.x == X_SIZE as i64 / 2 && c.y == Y_SIZE as i64 / 2)
            .unwrap();
        assert_eq!((centre.c, centre.jx, centre.jy), (0.0, 0.0, 0.0));
    }
}
