//! End-to-end summaries over a small synthetic grid.

use std::sync::Arc;

use approx::assert_relative_eq;
use climdex_grid::{AnnualIndexGrid, GridCoords};
use climdex_summary::{Location, Period, decades_covering, default_eras, summarize, to_json};
use ndarray::Array3;

fn grid(scenario: &str, years: Vec<i32>) -> AnnualIndexGrid {
    let coords = Arc::new(GridCoords::from_axes(&[60.0, 61.0], &[-147.0, -146.0]));
    let n = years.len();
    // Cell (1, 1) holds the year offset; every other cell holds -1.
    let values = Array3::from_shape_fn((n, 2, 2), |(y, r, c)| {
        if (r, c) == (1, 1) { y as f64 } else { -1.0 }
    });
    AnnualIndexGrid::new("su", "m", scenario, years, values, coords).unwrap()
}

#[test]
fn era_statistics_at_nearest_cell() {
    let g = grid("rcp45", (2006..=2100).collect());
    let valdez = Location::new("Valdez", 61.13, -146.35).unwrap();
    let rows = summarize(&[g], &[valdez], &default_eras());

    // 1980-2009 overlaps 2006..=2009 only.
    assert_eq!(rows.len(), 4);
    let first = &rows[0];
    assert_eq!((first.row, first.col), (1, 1));
    assert_eq!(first.n_years, 4);
    assert_eq!(first.min, Some(0.0));
    assert_eq!(first.max, Some(3.0));
    assert_relative_eq!(first.mean.unwrap(), 1.5);

    let late = &rows[3];
    assert_eq!(late.period, "2070-2099");
    assert_eq!(late.n_years, 30);
    assert_eq!(late.min, Some(64.0));
    assert_eq!(late.max, Some(93.0));
}

#[test]
fn nan_years_are_ignored() {
    let coords = Arc::new(GridCoords::from_axes(&[60.0], &[-150.0]));
    let values = Array3::from_shape_vec((4, 1, 1), vec![1.0, f64::NAN, 5.0, f64::NAN]).unwrap();
    let g = AnnualIndexGrid::new("cwd", "m", "hist", vec![1990, 1991, 1992, 1993], values, coords)
        .unwrap();
    let loc = Location::new("p", 60.0, -150.0).unwrap();
    let period = Period::new("all", 1990, 1993).unwrap();

    let rows = summarize(&[g], &[loc], &[period]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].n_years, 4);
    assert_eq!(rows[0].n_valid, 2);
    assert_relative_eq!(rows[0].mean.unwrap(), 3.0);
}

#[test]
fn all_nan_period_has_no_stats() {
    let coords = Arc::new(GridCoords::from_axes(&[60.0], &[-150.0]));
    let values = Array3::from_elem((2, 1, 1), f64::NAN);
    let g = AnnualIndexGrid::new("hd", "m", "hist", vec![2000, 2001], values, coords).unwrap();
    let loc = Location::new("p", 60.0, -150.0).unwrap();

    let rows = summarize(&[g], &[loc], &decades_covering(&[2000, 2001]));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].period, "2000s");
    assert_eq!(rows[0].min, None);
    assert_eq!(rows[0].mean, None);

    let json = to_json(&rows).unwrap();
    assert!(json.contains("\"max\": null"));
}

#[test]
fn historical_grid_skips_future_periods() {
    let g = grid("hist", (1980..=2005).collect());
    let loc = Location::new("p", 60.0, -147.0).unwrap();
    let rows = summarize(&[g], &[loc], &default_eras());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].period, "1980-2009");
    assert_eq!(rows[0].min, Some(-1.0));
}
