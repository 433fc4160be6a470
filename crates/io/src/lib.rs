//! # climdex-io
//!
//! Read daily model output from NetCDF files into [`GridSeries`] and write
//! annual index grids to long-format Parquet tables.
//!
//! [`GridSeries`]: climdex_grid::GridSeries

mod error;
mod netcdf_read;
mod parquet_read;
mod parquet_write;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::{ReaderConfig, read_grid_series};
pub use writer::{Compression, WriterConfig, read_indices_parquet, write_indices_parquet};
