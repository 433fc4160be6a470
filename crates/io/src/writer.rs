//! High-level Parquet writer configuration and orchestration.

use std::path::Path;
use std::str::FromStr;

use climdex_grid::AnnualIndexGrid;
use parquet::file::properties::WriterProperties;
use tracing::info;

use crate::error::IoError;
use crate::{parquet_read, parquet_write};

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level =
                    parquet::basic::ZstdLevel::try_new(3).map_err(|e| IoError::Parquet {
                        reason: e.to_string(),
                    })?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

impl FromStr for Compression {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "uncompressed" => Ok(Self::None),
            "snappy" => Ok(Self::Snappy),
            "zstd" => Ok(Self::Zstd),
            other => Err(IoError::Validation {
                count: 1,
                details: format!("unknown compression '{other}'"),
            }),
        }
    }
}

/// Configuration for writing annual index grids to Parquet.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Compression algorithm to use.
    compression: Compression,
    /// Maximum number of rows per row group.
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Compression algorithm.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Maximum number of rows per row group.
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `row_group_size` is zero.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::Validation {
                count: 1,
                details: "row_group_size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Write annual index grids to a long-format Parquet file.
///
/// Each grid becomes one record batch with a row per (year, cell). Returns
/// the number of rows written.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration is invalid, or
/// [`IoError::Parquet`] if batch conversion or file I/O fails.
#[tracing::instrument(skip_all, fields(path = %path.display(), n_grids = grids.len()))]
pub fn write_indices_parquet(
    path: &Path,
    grids: &[AnnualIndexGrid],
    config: &WriterConfig,
) -> Result<usize, IoError> {
    config.validate()?;

    let schema = parquet_write::build_schema();

    let compression = config.compression.to_parquet()?;
    let props = WriterProperties::builder()
        .set_compression(compression)
        .set_max_row_group_size(config.row_group_size)
        .build();

    let batches: Vec<_> = grids
        .iter()
        .map(|g| parquet_write::grid_to_record_batch(g, &schema))
        .collect::<Result<Vec<_>, _>>()?;
    let n_rows = batches.iter().map(|b| b.num_rows()).sum();

    parquet_write::write_batches(path, &batches, &schema, props)?;

    info!(n_rows, "wrote index table");
    Ok(n_rows)
}

/// Read a table written by [`write_indices_parquet`] back into grids.
///
/// Grids come back in the order their first row appears in the file.
/// Grids on identical coordinates share one [`GridCoords`] allocation.
///
/// [`GridCoords`]: climdex_grid::GridCoords
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the file is missing,
/// [`IoError::Validation`] if the schema differs or a grid is incomplete,
/// and [`IoError::Parquet`] on read failures.
pub fn read_indices_parquet(path: &Path) -> Result<Vec<AnnualIndexGrid>, IoError> {
    let batches = parquet_read::read_batches(path)?;
    let groups = parquet_read::group_rows(&batches)?;

    let mut shared = Vec::new();
    groups
        .into_iter()
        .map(|group| parquet_read::assemble_grid(group, &mut shared))
        .collect()
}
