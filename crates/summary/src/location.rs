//! Named point locations and nearest-cell lookup.

use climdex_grid::GridCoords;
use serde::Serialize;

use crate::error::SummaryError;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A named WGS84 point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    /// Creates a location, checking that latitude lies in `[-90, 90]` and
    /// longitude in `[-180, 360]`.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::InvalidLocation`] for out-of-range or
    /// non-finite coordinates.
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Result<Self, SummaryError> {
        let name = name.into();
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=360.0).contains(&lon) {
            return Err(SummaryError::InvalidLocation { name, lat, lon });
        }
        Ok(Self { name, lat, lon })
    }
}

/// The default reporting locations in Alaska.
pub fn default_locations() -> Vec<Location> {
    [
        ("Kaktovik", 70.1, -143.6),
        ("Stevens Village", 66.1, -149.1),
        ("Igiugik Village", 59.3, -155.9),
        ("Levelock", 59.1, -156.9),
        ("Eyak", 60.5, -145.6),
        ("Ketchikan", 55.6, -136.6),
        ("Aleutians", 57.838, -159.995),
        ("Nanwalek", 59.31, -157.91),
        ("Port Graham", 59.34, -151.83),
        ("Qutekcak (Seward)", 60.10, -149.44),
        ("Chenega Bay", 60.06, -148.01),
        ("Tatitlek", 60.86, -146.68),
        ("Valdez", 61.13, -146.35),
        ("Cordova", 60.54, -145.76),
    ]
    .into_iter()
    .map(|(name, lat, lon)| Location {
        name: name.to_string(),
        lat,
        lon,
    })
    .collect()
}

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = phi2 - phi1;
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Grid cell whose centre is closest to `location`.
///
/// Cells with NaN coordinates are ignored. Returns `None` for an empty grid.
pub fn nearest_cell(coords: &GridCoords, location: &Location) -> Option<(usize, usize)> {
    let (rows, cols) = coords.shape();
    let mut best: Option<((usize, usize), f64)> = None;
    for r in 0..rows {
        for c in 0..cols {
            let (lat, lon) = coords.cell(r, c);
            let d = haversine_km(location.lat, location.lon, lat, lon);
            if d.is_nan() {
                continue;
            }
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some(((r, c), d));
            }
        }
    }
    best.map(|(cell, _)| cell)
}
