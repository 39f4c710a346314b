use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use image::RgbaImage;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::DataError;
use super::model::{ConcentrationRow, FluxRow};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Columns the flux table must carry.
pub const FLUX_COLUMNS: [&str; 4] = ["x", "y", "Jx", "Jy"];
/// Columns the concentration table must carry.
pub const CONCENTRATION_COLUMNS: [&str; 3] = ["x", "y", "C"];

/// Load the flux map (`x, y, Jx, Jy`).
pub fn load_flux_table(path: &Path) -> Result<Vec<FluxRow>> {
    let rows = load_table(path, &FLUX_COLUMNS)?;
    let flux = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Ok(FluxRow {
                x: coordinate(i, 'x', r[0])?,
                y: coordinate(i, 'y', r[1])?,
                jx: r[2],
                jy: r[3],
            })
        })
        .collect::<Result<Vec<_>, DataError>>()?;
    Ok(flux)
}

/// Load the concentration map (`x, y, C`).
pub fn load_concentration_table(path: &Path) -> Result<Vec<ConcentrationRow>> {
    let rows = load_table(path, &CONCENTRATION_COLUMNS)?;
    let conc = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Ok(ConcentrationRow {
                x: coordinate(i, 'x', r[0])?,
                y: coordinate(i, 'y', r[1])?,
                c: r[2],
            })
        })
        .collect::<Result<Vec<_>, DataError>>()?;
    Ok(conc)
}

/// Truncate a pixel coordinate toward zero. NaN and infinities are rejected
/// instead of being cast to an arbitrary cell.
fn coordinate(row: usize, axis: char, value: f64) -> Result<i64, DataError> {
    if !value.is_finite() {
        return Err(DataError::NonFiniteCoordinate { row, axis, value });
    }
    Ok(value.trunc() as i64)
}

/// Decode the reference image into 8-bit RGBA.
pub fn load_reference_image(path: &Path) -> Result<RgbaImage> {
    let img = image::ImageReader::open(path)
        .with_context(|| format!("opening image {}", path.display()))?
        .with_guessed_format()
        .context("sniffing image format")?
        .decode()
        .with_context(|| format!("decoding image {}", path.display()))?;
    Ok(img.to_rgba8())
}

// ---------------------------------------------------------------------------
// Generic numeric table loading
// ---------------------------------------------------------------------------

/// Load a table and keep only `columns`, in request order.  Dispatch by
/// extension.
///
/// Supported formats:
/// * `.csv`          – comma-separated with a header row
/// * `.tsv` / `.tab` – tab-separated with a header row
/// * `.json`         – `[{ "x": 5, "y": 10, "C": 0.5 }, ...]`
/// * `.parquet`      – scalar integer or float columns
pub fn load_table(path: &Path, columns: &[&str]) -> Result<Vec<Vec<f64>>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => load_delimited(path, b',', columns)?,
        "tsv" | "tab" => load_delimited(path, b'\t', columns)?,
        "json" => load_json(path, columns)?,
        "parquet" | "pq" => load_parquet(path, columns)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string()).into()),
    };

    log::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn missing_column(path: &Path, column: &str) -> DataError {
    DataError::MissingColumn {
        table: path.display().to_string(),
        column: column.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8, columns: &[&str]) -> Result<Vec<Vec<f64>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = reader.headers().context("reading header row")?.clone();
    let indices = columns
        .iter()
        .map(|&col| {
            headers
                .iter()
                .position(|h| h == col)
                .ok_or_else(|| missing_column(path, col))
        })
        .collect::<Result<Vec<usize>, DataError>>()?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        // The header occupies line 1.
        let record = result.with_context(|| format!("line {}", row_no + 2))?;
        let line = record.position().map_or(row_no as u64 + 2, |p| p.line());
        let row = indices
            .iter()
            .zip(columns)
            .map(|(&idx, col)| parse_cell(record.get(idx).unwrap_or(""), line, col))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

fn parse_cell(s: &str, line: u64, col: &str) -> Result<f64> {
    s.parse::<f64>()
        .with_context(|| format!("line {line}, column '{col}': '{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path, columns: &[&str]) -> Result<Vec<Vec<f64>>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut row = Vec::with_capacity(columns.len());
        for &col in columns {
            let val = obj.get(col).ok_or_else(|| missing_column(path, col))?;
            let v = val
                .as_f64()
                .with_context(|| format!("Row {i}, column '{col}': not a number"))?;
            row.push(v);
        }
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); integer coordinate columns are widened
/// to `f64` like every other column.
fn load_parquet(path: &Path, columns: &[&str]) -> Result<Vec<Vec<f64>>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let cols = columns
            .iter()
            .map(|&col| {
                schema
                    .index_of(col)
                    .map(|idx| batch.column(idx).clone())
                    .map_err(|_| missing_column(path, col))
            })
            .collect::<Result<Vec<Arc<dyn Array>>, DataError>>()?;

        for row in 0..batch.num_rows() {
            let values = cols
                .iter()
                .zip(columns)
                .map(|(col, name)| {
                    extract_f64(col, row).with_context(|| format!("Row {row}: failed to read '{name}'"))
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push(values);
        }
    }

    Ok(rows)
}

/// Read one scalar numeric cell as `f64`.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    let value = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row) as f64,
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row) as f64,
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row) as f64,
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_csv_columns_in_any_order() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "c.csv", "C,extra,y,x\n0.5,foo,10,5\n0.25,bar,1,2\n");
        let rows = load_concentration_table(&path).unwrap();
        assert_eq!(
            rows,
            vec![
                ConcentrationRow { x: 5, y: 10, c: 0.5 },
                ConcentrationRow { x: 2, y: 1, c: 0.25 },
            ]
        );
    }

    #[test]
    fn test_float_coordinates_truncate() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "f.csv", "x,y,Jx,Jy\n3.0,4.9,1e-3,-2\n");
        let rows = load_flux_table(&path).unwrap();
        assert_eq!(rows, vec![FluxRow { x: 3, y: 4, jx: 1e-3, jy: -2.0 }]);
    }

    #[test]
    fn test_missing_column_aborts() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "f.csv", "x,y,Jx\n1,2,3\n");
        let err = load_flux_table(&path).unwrap_err();
        let data_err = err.downcast_ref::<DataError>().unwrap();
        assert!(matches!(data_err, DataError::MissingColumn { column, .. } if column == "Jy"));
    }

    #[test]
    fn test_non_numeric_cell_aborts() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "c.csv", "x,y,C\n1,2,abc\n");
        let err = load_concentration_table(&path).unwrap_err();
        assert!(format!("{err:#}").contains("'abc' is not a number"));
    }

    #[test]
    fn test_parse_errors_report_file_line() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "c.csv", "x,y,C\n1,2,0.5\n3,4,oops\n");
        let err = load_concentration_table(&path).unwrap_err();
        assert!(format!("{err:#}").contains("line 3, column 'C'"));
    }

    #[test]
    fn test_non_finite_coordinates_abort() {
        let dir = TempDir::new().unwrap();
        let nan = write(&dir, "nan.csv", "x,y,C\nnan,NaN,0.7\n");
        let err = load_concentration_table(&nan).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::NonFiniteCoordinate { row: 0, axis: 'x', .. })
        ));

        let inf = write(&dir, "inf.csv", "x,y,Jx,Jy\n1,2,0,0\n3,inf,0.1,0.2\n");
        let err = load_flux_table(&inf).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::NonFiniteCoordinate { row: 1, axis: 'y', .. })
        ));
    }

    #[test]
    fn test_missing_file_aborts() {
        let dir = TempDir::new().unwrap();
        assert!(load_concentration_table(&dir.path().join("nope.csv")).is_err());
    }

    #[test]
    fn test_tsv_and_json() {
        let dir = TempDir::new().unwrap();
        let tsv = write(&dir, "c.tsv", "x\ty\tC\n1\t2\t0.75\n");
        assert_eq!(
            load_concentration_table(&tsv).unwrap(),
            vec![ConcentrationRow { x: 1, y: 2, c: 0.75 }]
        );

        let json = write(&dir, "f.json", r#"[{"x": 4, "y": 0, "Jx": 1.5, "Jy": 0.5, "id": "a"}]"#);
        assert_eq!(
            load_flux_table(&json).unwrap(),
            vec![FluxRow { x: 4, y: 0, jx: 1.5, jy: 0.5 }]
        );
    }

    #[test]
    fn test_parquet_integer_and_float_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("x", DataType::Int64, false),
            Field::new("y", DataType::Int32, false),
            Field::new("C", DataType::Float32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![5, 6])),
                Arc::new(Int32Array::from(vec![10, 11])),
                Arc::new(Float32Array::from(vec![0.5, 0.25])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let rows = load_concentration_table(&path).unwrap();
        assert_eq!(
            rows,
            vec![
                ConcentrationRow { x: 5, y: 10, c: 0.5 },
                ConcentrationRow { x: 6, y: 11, c: 0.25 },
            ]
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "c.xlsx", "");
        let err = load_concentration_table(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::UnsupportedFormat("xlsx".into()))
        );
    }

    #[test]
    fn test_reference_image_decodes_to_rgba() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ref.png");
        image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let img = load_reference_image(&path).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }
}
