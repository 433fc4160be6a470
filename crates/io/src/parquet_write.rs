//! Low-level Parquet column building.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, RecordBatch, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use climdex_grid::AnnualIndexGrid;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::IoError;

/// Column names of the long-format index table, in schema order.
pub(crate) const COLUMNS: [&str; 9] = [
    "index_id", "model", "scenario", "year", "row", "col", "lat", "lon", "value",
];

/// Builds the Arrow schema for annual index output.
///
/// One row per (index, model, scenario, year, cell). Missing index values
/// are stored as NaN.
pub(crate) fn build_schema() -> Schema {
    Schema::new(vec![
        Field::new(COLUMNS[0], DataType::Utf8, false),
        Field::new(COLUMNS[1], DataType::Utf8, false),
        Field::new(COLUMNS[2], DataType::Utf8, false),
        Field::new(COLUMNS[3], DataType::Int32, false),
        Field::new(COLUMNS[4], DataType::UInt32, false),
        Field::new(COLUMNS[5], DataType::UInt32, false),
        Field::new(COLUMNS[6], DataType::Float64, false),
        Field::new(COLUMNS[7], DataType::Float64, false),
        Field::new(COLUMNS[8], DataType::Float64, false),
    ])
}

/// Converts one [`AnnualIndexGrid`] into an Arrow [`RecordBatch`].
///
/// Rows are ordered by year, then grid row, then grid column.
pub(crate) fn grid_to_record_batch(
    grid: &AnnualIndexGrid,
    schema: &Schema,
) -> Result<RecordBatch, IoError> {
    let (rows, cols) = grid.shape();
    let n = grid.years().len() * rows * cols;
    let coords = grid.coords();
    let values = grid.values();

    let mut years = Vec::with_capacity(n);
    let mut row_idx = Vec::with_capacity(n);
    let mut col_idx = Vec::with_capacity(n);
    let mut lats = Vec::with_capacity(n);
    let mut lons = Vec::with_capacity(n);
    let mut vals = Vec::with_capacity(n);

    for (y, &year) in grid.years().iter().enumerate() {
        for r in 0..rows {
            for c in 0..cols {
                let (lat, lon) = coords.cell(r, c);
                years.push(year);
                row_idx.push(r as u32);
                col_idx.push(c as u32);
                lats.push(lat);
                lons.push(lon);
                vals.push(values[[y, r, c]]);
            }
        }
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec![grid.index_id(); n])),
        Arc::new(StringArray::from(vec![grid.model(); n])),
        Arc::new(StringArray::from(vec![grid.scenario(); n])),
        Arc::new(Int32Array::from(years)),
        Arc::new(UInt32Array::from(row_idx)),
        Arc::new(UInt32Array::from(col_idx)),
        Arc::new(Float64Array::from(lats)),
        Arc::new(Float64Array::from(lons)),
        Arc::new(Float64Array::from(vals)),
    ];

    RecordBatch::try_new(Arc::new(schema.clone()), columns).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`IoError::Parquet`] if file creation, batch writing, or file
/// finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
