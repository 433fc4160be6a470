//! Low-level Parquet reading and regrouping into annual grids.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{AsArray, RecordBatch};
use arrow::datatypes::{Float64Type, Int32Type, UInt32Type};
use climdex_grid::{AnnualIndexGrid, GridCoords};
use ndarray::{Array2, Array3};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::IoError;
use crate::parquet_write::COLUMNS;

/// Reads all record batches from a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file does not exist, or
/// [`IoError::Parquet`] if the file cannot be opened or read.
pub(crate) fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let batches: Vec<RecordBatch> =
        reader
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| IoError::Parquet {
                reason: e.to_string(),
            })?;

    Ok(batches)
}

/// Checks that a batch carries the index table columns in order.
///
/// # Errors
///
/// Returns [`IoError::Validation`] listing every mismatched column.
pub(crate) fn validate_schema(batch: &RecordBatch) -> Result<(), IoError> {
    let schema = batch.schema();
    if schema.fields().len() != COLUMNS.len() {
        return Err(IoError::Validation {
            count: 1,
            details: format!(
                "expected {} columns, got {}",
                COLUMNS.len(),
                schema.fields().len()
            ),
        });
    }

    let mismatches: Vec<String> = COLUMNS
        .iter()
        .zip(schema.fields().iter())
        .enumerate()
        .filter(|(_, (expected, field))| field.name() != *expected)
        .map(|(i, (expected, field))| {
            format!("column {i}: expected '{expected}', got '{}'", field.name())
        })
        .collect();

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(IoError::Validation {
            count: mismatches.len(),
            details: mismatches.join("; "),
        })
    }
}

/// One decoded table row.
pub(crate) struct Cell {
    year: i32,
    row: usize,
    col: usize,
    lat: f64,
    lon: f64,
    value: f64,
}

/// Rows belonging to one (index, model, scenario) grid.
pub(crate) struct GroupAccum {
    index_id: String,
    model: String,
    scenario: String,
    cells: Vec<Cell>,
}

/// Groups rows by (index, model, scenario), keeping first-appearance order.
pub(crate) fn group_rows(batches: &[RecordBatch]) -> Result<Vec<GroupAccum>, IoError> {
    let mut groups: Vec<GroupAccum> = Vec::new();
    let mut lookup: HashMap<(String, String, String), usize> = HashMap::new();

    for batch in batches {
        validate_schema(batch)?;

        let ids = batch.column(0).as_string::<i32>();
        let models = batch.column(1).as_string::<i32>();
        let scenarios = batch.column(2).as_string::<i32>();
        let years = batch.column(3).as_primitive::<Int32Type>();
        let rows = batch.column(4).as_primitive::<UInt32Type>();
        let cols = batch.column(5).as_primitive::<UInt32Type>();
        let lats = batch.column(6).as_primitive::<Float64Type>();
        let lons = batch.column(7).as_primitive::<Float64Type>();
        let values = batch.column(8).as_primitive::<Float64Type>();

        for i in 0..batch.num_rows() {
            let key = (
                ids.value(i).to_string(),
                models.value(i).to_string(),
                scenarios.value(i).to_string(),
            );
            let slot = match lookup.get(&key) {
                Some(&slot) => slot,
                None => {
                    let slot = groups.len();
                    groups.push(GroupAccum {
                        index_id: key.0.clone(),
                        model: key.1.clone(),
                        scenario: key.2.clone(),
                        cells: Vec::new(),
                    });
                    lookup.insert(key, slot);
                    slot
                }
            };
            groups[slot].cells.push(Cell {
                year: years.value(i),
                row: rows.value(i) as usize,
                col: cols.value(i) as usize,
                lat: lats.value(i),
                lon: lons.value(i),
                value: values.value(i),
            });
        }
    }

    Ok(groups)
}

/// Rebuilds an [`AnnualIndexGrid`] from its rows.
///
/// Coordinates equal to an entry of `shared` reuse that allocation;
/// otherwise the new coordinates are appended to `shared`.
pub(crate) fn assemble_grid(
    group: GroupAccum,
    shared: &mut Vec<Arc<GridCoords>>,
) -> Result<AnnualIndexGrid, IoError> {
    let mut years: Vec<i32> = group.cells.iter().map(|c| c.year).collect();
    years.sort_unstable();
    years.dedup();
    let rows = group.cells.iter().map(|c| c.row + 1).max().unwrap_or(0);
    let cols = group.cells.iter().map(|c| c.col + 1).max().unwrap_or(0);

    let expected = years.len() * rows * cols;
    if group.cells.len() != expected {
        return Err(IoError::Validation {
            count: 1,
            details: format!(
                "{}/{}/{}: expected {expected} rows for a {}x{}x{} grid, got {}",
                group.index_id,
                group.model,
                group.scenario,
                years.len(),
                rows,
                cols,
                group.cells.len()
            ),
        });
    }

    let mut values = Array3::from_elem((years.len(), rows, cols), f64::NAN);
    let mut lat = Array2::zeros((rows, cols));
    let mut lon = Array2::zeros((rows, cols));
    for cell in &group.cells {
        // `years` holds every cell year, so the search always succeeds.
        let y = years.binary_search(&cell.year).unwrap_or_default();
        values[[y, cell.row, cell.col]] = cell.value;
        lat[[cell.row, cell.col]] = cell.lat;
        lon[[cell.row, cell.col]] = cell.lon;
    }

    let coords = GridCoords::new(lat, lon)?;
    let coords = match shared.iter().find(|c| ***c == coords) {
        Some(existing) => Arc::clone(existing),
        None => {
            let coords = Arc::new(coords);
            shared.push(Arc::clone(&coords));
            coords
        }
    };

    Ok(AnnualIndexGrid::new(
        group.index_id,
        group.model,
        group.scenario,
        years,
        values,
        coords,
    )?)
}
