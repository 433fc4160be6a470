//! High-level NetCDF reader configuration and orchestration.

use std::path::Path;
use std::sync::Arc;

use climdex_calendar::Calendar;
use climdex_grid::{GridCoords, GridSeries};
use ndarray::{Array2, Array3};
use tracing::{debug, info};

use crate::error::IoError;
use crate::netcdf_read;

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading a daily gridded variable from NetCDF.
///
/// The [`Default`] implementation supplies CF-convention names suitable for
/// CORDEX-style regional model output.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Aliases to try when looking up longitude coordinates.
    lon_aliases: Vec<String>,
    /// Aliases to try when looking up latitude coordinates.
    lat_aliases: Vec<String>,
    /// NetCDF variable name for the time axis.
    time_var: String,
    /// Calendar assumed when the time variable has no `calendar` attribute.
    default_calendar: Calendar,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            lon_aliases: vec!["lon".into(), "longitude".into(), "x".into(), "rlon".into()],
            lat_aliases: vec!["lat".into(), "latitude".into(), "y".into(), "rlat".into()],
            time_var: "time".into(),
            default_calendar: Calendar::Standard,
        }
    }
}

impl ReaderConfig {
    /// Set the time variable name.
    pub fn with_time_var(mut self, name: impl Into<String>) -> Self {
        self.time_var = name.into();
        self
    }

    /// Replace the latitude aliases.
    pub fn with_lat_aliases(mut self, aliases: Vec<String>) -> Self {
        self.lat_aliases = aliases;
        self
    }

    /// Replace the longitude aliases.
    pub fn with_lon_aliases(mut self, aliases: Vec<String>) -> Self {
        self.lon_aliases = aliases;
        self
    }

    /// Set the calendar used when the file does not declare one.
    pub fn with_default_calendar(mut self, calendar: Calendar) -> Self {
        self.default_calendar = calendar;
        self
    }

    /// Time variable name.
    pub fn time_var(&self) -> &str {
        &self.time_var
    }

    /// Calendar used when the file does not declare one.
    pub fn default_calendar(&self) -> Calendar {
        self.default_calendar
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if the time variable name is empty or
    /// an alias list is empty.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        if self.time_var.trim().is_empty() {
            problems.push("time_var must not be empty".to_string());
        }
        if self.lat_aliases.is_empty() {
            problems.push("lat_aliases must not be empty".to_string());
        }
        if self.lon_aliases.is_empty() {
            problems.push("lon_aliases must not be empty".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// read_grid_series
// ---------------------------------------------------------------------------

/// Read one daily variable from a NetCDF file into a [`GridSeries`].
///
/// The variable must be laid out `time x y x`. Coordinates may be 1-D axes,
/// which are broadcast to a regular grid, or 2-D curvilinear arrays.
/// Fill values become NaN.
///
/// # Errors
///
/// Returns [`IoError`] on missing variables, coordinate shapes that do not
/// match the data, undecodable time axes, or non-increasing dates.
#[tracing::instrument(skip_all, fields(path = %path.display(), variable = variable))]
pub fn read_grid_series(
    path: &Path,
    variable: &str,
    model: &str,
    scenario: &str,
    config: &ReaderConfig,
) -> Result<GridSeries, IoError> {
    config.validate()?;

    let file = netcdf_read::open_file(path)?;

    // -- Time ---------------------------------------------------------------

    let (offsets, _) = netcdf_read::read_coord(&file, &[config.time_var.as_str()], path)?;
    let axis =
        netcdf_read::read_time_axis(&file, &config.time_var, config.default_calendar, path)?;
    let times = netcdf_read::offsets_to_dates(&axis, &offsets)?;

    // -- 3-D data -----------------------------------------------------------

    let (data, [nt, ny, nx]) = netcdf_read::read_3d_f64(&file, variable, path)?;
    if nt != times.len() {
        return Err(IoError::DimensionMismatch {
            name: config.time_var.clone(),
            expected: nt,
            got: times.len(),
        });
    }

    // -- Coordinates --------------------------------------------------------

    let lat_refs: Vec<&str> = config.lat_aliases.iter().map(String::as_str).collect();
    let lon_refs: Vec<&str> = config.lon_aliases.iter().map(String::as_str).collect();
    let (lats, lat_shape) = netcdf_read::read_coord(&file, &lat_refs, path)?;
    let (lons, lon_shape) = netcdf_read::read_coord(&file, &lon_refs, path)?;
    let coords = build_coords(lats, &lat_shape, lons, &lon_shape, ny, nx)?;

    let values = Array3::from_shape_vec((nt, ny, nx), data).map_err(|e| IoError::Netcdf {
        reason: format!("failed to reshape '{variable}': {e}"),
    })?;

    let series = GridSeries::new(variable, model, scenario, times, values, Arc::new(coords))?;

    debug!(
        all_nan_steps = series.count_all_nan_steps(),
        calendar = ?axis.calendar,
        "decoded series"
    );
    info!(
        n_times = nt,
        rows = ny,
        cols = nx,
        model = model,
        scenario = scenario,
        "read grid series"
    );
    Ok(series)
}

/// Turns raw coordinate variables into [`GridCoords`] for an `ny x nx` grid.
fn build_coords(
    lats: Vec<f64>,
    lat_shape: &[usize],
    lons: Vec<f64>,
    lon_shape: &[usize],
    ny: usize,
    nx: usize,
) -> Result<GridCoords, IoError> {
    match (lat_shape, lon_shape) {
        ([n_lat], [n_lon]) => {
            if *n_lat != ny {
                return Err(IoError::DimensionMismatch {
                    name: "lat".into(),
                    expected: ny,
                    got: *n_lat,
                });
            }
            if *n_lon != nx {
                return Err(IoError::DimensionMismatch {
                    name: "lon".into(),
                    expected: nx,
                    got: *n_lon,
                });
            }
            Ok(GridCoords::from_axes(&lats, &lons))
        }
        ([lat_y, lat_x], [lon_y, lon_x]) => {
            if (*lat_y, *lat_x) != (ny, nx) || (*lon_y, *lon_x) != (ny, nx) {
                return Err(IoError::DimensionMismatch {
                    name: "lat/lon".into(),
                    expected: ny * nx,
                    got: lats.len().max(lons.len()),
                });
            }
            let lat = Array2::from_shape_vec((ny, nx), lats).map_err(|e| IoError::Netcdf {
                reason: format!("failed to reshape lat: {e}"),
            })?;
            let lon = Array2::from_shape_vec((ny, nx), lons).map_err(|e| IoError::Netcdf {
                reason: format!("failed to reshape lon: {e}"),
            })?;
            Ok(GridCoords::new(lat, lon)?)
        }
        _ => Err(IoError::DimensionMismatch {
            name: "coordinate rank".into(),
            expected: 2,
            got: lat_shape.len().max(lon_shape.len()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let cfg = ReaderConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.time_var(), "time");
        assert_eq!(cfg.default_calendar(), Calendar::Standard);
    }

    #[test]
    fn validate_collects_problems() {
        let cfg = ReaderConfig::default()
            .with_time_var(" ")
            .with_lat_aliases(Vec::new());
        match cfg.validate() {
            Err(IoError::Validation { count, details }) => {
                assert_eq!(count, 2);
                assert!(details.contains("time_var"));
                assert!(details.contains("lat_aliases"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn coords_from_axes() {
        let coords = build_coords(vec![60.0, 61.0], &[2], vec![-150.0, -149.0, -148.0], &[3], 2, 3)
            .unwrap();
        assert_eq!(coords.shape(), (2, 3));
        assert_eq!(coords.cell(1, 2), (61.0, -148.0));
    }

    #[test]
    fn coords_curvilinear() {
        let lats = vec![60.0, 60.1, 61.0, 61.1];
        let lons = vec![-150.0, -149.0, -150.2, -149.2];
        let coords = build_coords(lats, &[2, 2], lons, &[2, 2], 2, 2).unwrap();
        assert_eq!(coords.cell(1, 0), (61.0, -150.2));
    }

    #[test]
    fn coords_axis_length_mismatch() {
        let err = build_coords(vec![60.0], &[1], vec![-150.0, -149.0], &[2], 2, 2).unwrap_err();
        assert!(matches!(err, IoError::DimensionMismatch { ref name, .. } if name == "lat"));
    }

    #[test]
    fn coords_mixed_rank_rejected() {
        let err = build_coords(vec![60.0, 61.0], &[2], vec![0.0; 4], &[2, 2], 2, 2).unwrap_err();
        assert!(matches!(err, IoError::DimensionMismatch { .. }));
    }
}
