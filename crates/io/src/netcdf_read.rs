//! Low-level NetCDF extraction helpers.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use climdex_calendar::{Calendar, DailyDate};
use netcdf::AttributeValue;

use crate::error::IoError;

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a coordinate variable, trying each alias in order.
///
/// Returns the flattened values together with the variable's shape, which
/// is `[n]` for an axis and `[ny, nx]` for a curvilinear grid.
pub(crate) fn read_coord(
    file: &netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<(Vec<f64>, Vec<usize>), IoError> {
    for &alias in aliases {
        if let Some(var) = file.variable(alias) {
            let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
            return Ok((var.get_values::<f64, _>(..)?, shape));
        }
    }

    let name = aliases.first().copied().unwrap_or("unknown");
    Err(IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// Read a 3-D `f64` variable and return the flattened data together with
/// the shape `[nt, ny, nx]`. Values equal to `_FillValue` or
/// `missing_value` are replaced with NaN.
pub(crate) fn read_3d_f64(
    file: &netcdf::File,
    var_name: &str,
    path: &Path,
) -> Result<(Vec<f64>, [usize; 3]), IoError> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| IoError::MissingVariable {
            name: var_name.to_string(),
            path: path.to_path_buf(),
        })?;

    let dims = var.dimensions();
    if dims.len() != 3 {
        return Err(IoError::DimensionMismatch {
            name: format!("{var_name} dimensions"),
            expected: 3,
            got: dims.len(),
        });
    }
    let shape = [dims[0].len(), dims[1].len(), dims[2].len()];

    let mut data = var.get_values::<f64, _>(..)?;
    let fills = fill_values(&var);
    if !fills.is_empty() {
        for v in &mut data {
            if fills.contains(v) {
                *v = f64::NAN;
            }
        }
    }
    Ok((data, shape))
}

/// Collects `_FillValue` and `missing_value` attributes as `f64`.
fn fill_values(var: &netcdf::Variable<'_>) -> Vec<f64> {
    let mut fills = Vec::new();
    for name in ["_FillValue", "missing_value"] {
        if let Some(Ok(value)) = var.attribute_value(name) {
            fills.extend(attribute_as_f64(value));
        }
    }
    fills
}

fn attribute_as_f64(value: AttributeValue) -> Vec<f64> {
    match value {
        AttributeValue::Double(v) => vec![v],
        AttributeValue::Doubles(v) => v,
        AttributeValue::Float(v) => vec![f64::from(v)],
        AttributeValue::Floats(v) => v.into_iter().map(f64::from).collect(),
        AttributeValue::Int(v) => vec![f64::from(v)],
        AttributeValue::Ints(v) => v.into_iter().map(f64::from).collect(),
        AttributeValue::Short(v) => vec![f64::from(v)],
        AttributeValue::Shorts(v) => v.into_iter().map(f64::from).collect(),
        _ => Vec::new(),
    }
}

/// Step of a CF time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeStep {
    Days,
    Hours,
}

impl TimeStep {
    fn per_day(self) -> f64 {
        match self {
            Self::Days => 1.0,
            Self::Hours => 24.0,
        }
    }
}

/// Decoded `units` and `calendar` of a time variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimeAxis {
    pub step: TimeStep,
    pub base: DailyDate,
    pub calendar: Calendar,
}

/// Parses CF time units such as `"days since 1949-12-01 00:00:00"`.
///
/// The time-of-day part of the reference date is ignored.
pub(crate) fn parse_time_units(units: &str) -> Result<(TimeStep, DailyDate), IoError> {
    let parts: Vec<&str> = units.split_whitespace().collect();
    if parts.len() < 3 || parts[1] != "since" {
        return Err(IoError::InvalidTime {
            reason: format!("unexpected time units format: '{units}'"),
        });
    }

    let step = match parts[0].to_lowercase().as_str() {
        "days" | "day" | "d" => TimeStep::Days,
        "hours" | "hour" | "h" => TimeStep::Hours,
        other => {
            return Err(IoError::InvalidTime {
                reason: format!("unsupported time unit '{other}'"),
            });
        }
    };

    // "1949-12-01T00:00:00" and "1949-12-01" both start with the date.
    let date_str = parts[2].split('T').next().unwrap_or(parts[2]);
    let base = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| IoError::InvalidTime {
        reason: format!("failed to parse base date '{date_str}': {e}"),
    })?;
    let base = DailyDate::new(base.year(), base.month() as u8, base.day() as u8)?;
    Ok((step, base))
}

/// Read the `units` and optional `calendar` attributes from a time variable.
///
/// A missing `calendar` attribute falls back to `default_calendar`.
pub(crate) fn read_time_axis(
    file: &netcdf::File,
    time_var: &str,
    default_calendar: Calendar,
    path: &Path,
) -> Result<TimeAxis, IoError> {
    let var = file
        .variable(time_var)
        .ok_or_else(|| IoError::MissingVariable {
            name: time_var.to_string(),
            path: path.to_path_buf(),
        })?;

    let units_str: String = var
        .attribute_value("units")
        .ok_or_else(|| IoError::InvalidTime {
            reason: format!("time variable '{time_var}' has no 'units' attribute"),
        })?
        .map_err(|e| IoError::InvalidTime {
            reason: format!("failed to read 'units' attribute: {e}"),
        })?
        .try_into()
        .map_err(|e: netcdf::Error| IoError::InvalidTime {
            reason: format!("'units' attribute is not a string: {e}"),
        })?;
    let (step, base) = parse_time_units(&units_str)?;

    let calendar = match var.attribute_value("calendar").and_then(|res| res.ok()) {
        Some(AttributeValue::Str(name)) => Calendar::from_cf(&name)?,
        _ => default_calendar,
    };

    Ok(TimeAxis {
        step,
        base,
        calendar,
    })
}

/// Convert time offsets into dates on `axis`.
///
/// Offsets are floored to whole days, so values stamped at noon fall on
/// their own day.
pub(crate) fn offsets_to_dates(axis: &TimeAxis, offsets: &[f64]) -> Result<Vec<DailyDate>, IoError> {
    offsets
        .iter()
        .map(|&offset| {
            if !offset.is_finite() {
                return Err(IoError::InvalidTime {
                    reason: format!("non-finite time offset {offset}"),
                });
            }
            let days = (offset / axis.step.per_day()).floor() as i64;
            Ok(axis.calendar.add_days(axis.base, days)?)
        })
        .collect()
}
