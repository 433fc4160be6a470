use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use climdex_calendar::{Calendar, DailyDate, daily_sequence};
use climdex_grid::{GridCoords, GridSeries};
use climdex_indices::{
    IndexCatalog, IndexEngine, IndexError, InputUnits, SeriesSource, WorkUnit, run_batch,
};
use ndarray::Array3;

/// In-memory source keyed by (model, scenario, variable).
struct MemorySource {
    series: HashMap<(String, String, String), GridSeries>,
    baseline_scenario: String,
    baseline_loads: AtomicUsize,
}

impl MemorySource {
    fn new() -> Self {
        Self {
            series: HashMap::new(),
            baseline_scenario: "hist".to_string(),
            baseline_loads: AtomicUsize::new(0),
        }
    }

    fn insert(&mut self, model: &str, scenario: &str, variable: &str, value: f64, years: usize) {
        let start = DailyDate::new(if scenario == "hist" { 1981 } else { 2041 }, 1, 1).unwrap();
        let n = 365 * years;
        let times = daily_sequence(start, n, Calendar::NoLeap).unwrap();
        let coords = Arc::new(GridCoords::from_axes(&[60.0, 61.0], &[-150.0]));
        let values = Array3::from_elem((n, 2, 1), value);
        let series = GridSeries::new(variable, model, scenario, times, values, coords).unwrap();
        self.series.insert(
            (model.to_string(), scenario.to_string(), variable.to_string()),
            series,
        );
    }

    fn get(&self, model: &str, scenario: &str, variable: &str) -> Result<GridSeries, IndexError> {
        self.series
            .get(&(model.to_string(), scenario.to_string(), variable.to_string()))
            .cloned()
            .ok_or_else(|| IndexError::Source {
                what: format!("{variable} {model} {scenario}"),
                source: "file not found".into(),
            })
    }
}

impl SeriesSource for MemorySource {
    fn load(&self, unit: &WorkUnit) -> Result<GridSeries, IndexError> {
        self.get(&unit.model, &unit.scenario, &unit.variable)
    }

    fn load_baseline(&self, unit: &WorkUnit) -> Result<Arc<GridSeries>, IndexError> {
        self.baseline_loads.fetch_add(1, Ordering::Relaxed);
        self.get(&unit.model, &self.baseline_scenario, &unit.variable)
            .map(Arc::new)
    }
}

fn unit(model: &str, scenario: &str, variable: &str, ids: &[&str]) -> WorkUnit {
    WorkUnit {
        model: model.to_string(),
        scenario: scenario.to_string(),
        variable: variable.to_string(),
        index_ids: ids.iter().map(|s| s.to_string()).collect(),
    }
}

fn engine() -> IndexEngine {
    IndexEngine::new(Arc::new(IndexCatalog::new(InputUnits::default())))
}

#[test]
fn failures_are_isolated_per_unit_and_index() {
    let mut source = MemorySource::new();
    source.insert("A", "hist", "tasmax", 280.0, 10);
    source.insert("A", "rcp45", "tasmax", 300.0, 2);
    source.insert("A", "rcp45", "pr", 0.0, 2);

    let units = vec![
        unit("A", "rcp45", "tasmax", &["hd", "su", "wsdi"]),
        unit("A", "rcp85", "tasmax", &["hd"]),
        unit("A", "rcp45", "pr", &["rx1day", "tx90p"]),
    ];
    let report = run_batch(&engine(), &units, &source);

    let ids: Vec<(&str, &str)> = report
        .grids
        .iter()
        .map(|g| (g.index_id(), g.scenario()))
        .collect();
    assert_eq!(
        ids,
        vec![
            ("hd", "rcp45"),
            ("su", "rcp45"),
            ("wsdi", "rcp45"),
            ("rx1day", "rcp45")
        ]
    );

    assert_eq!(report.failures.len(), 2);
    let missing = &report.failures[0];
    assert_eq!(missing.scenario, "rcp85");
    assert_eq!(missing.index_id, None);
    assert!(missing.reason.contains("file not found"), "{}", missing.reason);
    let unknown = &report.failures[1];
    assert_eq!(unknown.index_id.as_deref(), Some("tx90p"));
    assert!(!report.is_complete());
}

#[test]
fn baseline_loaded_only_for_spell_units() {
    let mut source = MemorySource::new();
    source.insert("A", "hist", "tasmax", 280.0, 10);
    source.insert("A", "rcp45", "tasmax", 300.0, 2);
    source.insert("A", "rcp85", "tasmax", 305.0, 2);

    let units = vec![
        unit("A", "rcp45", "tasmax", &["hd"]),
        unit("A", "rcp85", "tasmax", &["wsdi"]),
        unit("A", "rcp45", "tasmax", &["wsdi"]),
    ];
    let engine = engine();
    let report = run_batch(&engine, &units, &source);
    assert!(report.is_complete());
    assert_eq!(source.baseline_loads.load(Ordering::Relaxed), 2);
    assert_eq!(engine.cache().builds(), 1);
    for grid in report.grids.iter().filter(|g| g.index_id() == "wsdi") {
        assert_eq!(grid.get(2041, 1, 0), Some(365.0));
    }
}

#[test]
fn missing_baseline_reports_load_error() {
    let mut source = MemorySource::new();
    source.insert("B", "rcp85", "tasmin", 250.0, 1);
    let report = run_batch(&engine(), &[unit("B", "rcp85", "tasmin", &["cd", "csdi"])], &source);
    assert_eq!(report.grids.len(), 1);
    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.index_id.as_deref(), Some("csdi"));
    assert!(failure.reason.contains("needs a baseline"), "{}", failure.reason);
    assert!(failure.reason.contains("file not found"), "{}", failure.reason);
}

#[test]
fn failures_serialize_for_manifest() {
    let source = MemorySource::new();
    let report = run_batch(&engine(), &[unit("C", "hist", "pr", &["rx1day"])], &source);
    let json = serde_json::to_value(&report.failures).unwrap();
    assert_eq!(json[0]["model"], "C");
    assert_eq!(json[0]["variable"], "pr");
    assert!(json[0]["index_id"].is_null());
}
