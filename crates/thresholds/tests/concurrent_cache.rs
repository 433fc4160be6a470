use std::sync::Arc;

use approx::assert_relative_eq;
use climdex_calendar::{Calendar, DailyDate, Doy, daily_sequence};
use climdex_grid::{GridCoords, GridSeries};
use climdex_stats::quantile_type7;
use climdex_thresholds::{ThresholdCache, ThresholdConfig, build_thresholds};
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

fn random_baseline(seed: u64, years: usize) -> GridSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = 365 * years;
    let start = DailyDate::new(1981, 1, 1).unwrap();
    let times = daily_sequence(start, n, Calendar::NoLeap).unwrap();
    let values = Array3::from_shape_fn((n, 2, 2), |_| rng.random_range(250.0..300.0));
    let coords = Arc::new(GridCoords::from_axes(&[60.0, 61.0], &[10.0, 11.0]));
    GridSeries::new("tasmax", "MOD", "hist", times, values, coords).unwrap()
}

#[test]
fn concurrent_requests_build_once() {
    let baseline = random_baseline(3, 5);
    let cache = ThresholdCache::new();
    let config = ThresholdConfig::new();

    let tables: Vec<_> = (0..16)
        .into_par_iter()
        .map(|_| cache.thresholds_for(&baseline, 90.0, &config).unwrap())
        .collect();

    assert_eq!(cache.builds(), 1);
    for t in &tables[1..] {
        assert!(Arc::ptr_eq(&tables[0], t));
    }
}

#[test]
fn matches_naive_pooling() {
    let baseline = random_baseline(4, 6);
    let config = ThresholdConfig::new();
    let table = build_thresholds(&baseline, 90.0, &config).unwrap();

    for doy in [1u16, 59, 180, 365] {
        let center = Doy::new(doy).unwrap().index() as i64;
        let mut pool: Vec<f64> = baseline
            .times()
            .iter()
            .zip(baseline.cell(1, 0).iter())
            .filter(|(t, _)| {
                let d = t.doy().index() as i64;
                let dist = (d - center).rem_euclid(365);
                dist <= 2 || dist >= 363
            })
            .map(|(_, &v)| v)
            .collect();
        assert_eq!(pool.len(), 30);
        pool.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected = quantile_type7(&pool, 0.9);
        assert_relative_eq!(
            table.get(Doy::new(doy).unwrap(), 1, 0),
            expected,
            epsilon = 1e-12
        );
    }
}
