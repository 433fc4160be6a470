use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level climdex configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ClimdexConfig {
    /// Input discovery and NetCDF reading.
    #[serde(default)]
    pub input: InputToml,

    /// Models, scenarios, variables and indices to compute.
    #[serde(default)]
    pub run: RunToml,

    /// Units of the input data.
    #[serde(default)]
    pub units: UnitsToml,

    /// Percentile threshold settings for spell indices.
    #[serde(default)]
    pub thresholds: ThresholdsToml,

    /// Output paths and Parquet settings.
    #[serde(default)]
    pub output: OutputToml,

    /// Point summary settings.
    #[serde(default)]
    pub summary: SummaryToml,
}

/// Reads and parses a TOML configuration file.
pub fn load(path: &Path) -> Result<ClimdexConfig> {
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str).context("failed to parse TOML config")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputToml {
    #[serde(default = "default_input_dir")]
    pub dir: PathBuf,
    /// Filename with `{variable}`, `{model}` and `{scenario}` placeholders.
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_time_var")]
    pub time_var: String,
    /// Calendar assumed when a file has no `calendar` attribute.
    #[serde(default = "default_calendar")]
    pub default_calendar: String,
}

impl Default for InputToml {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            template: default_template(),
            time_var: default_time_var(),
            default_calendar: default_calendar(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_template() -> String {
    "ARC44_{variable}_{model}_{scenario}_ERA5bc.nc".to_string()
}
fn default_time_var() -> String {
    "time".to_string()
}
fn default_calendar() -> String {
    "standard".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunToml {
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<String>,
    #[serde(default = "default_variables")]
    pub variables: Vec<String>,
    /// Scenario whose series provide percentile baselines.
    #[serde(default = "default_baseline_scenario")]
    pub baseline_scenario: String,
    /// Variable name -> index ids computed from it.
    #[serde(default = "default_indices")]
    pub indices: BTreeMap<String, Vec<String>>,
    /// Index id -> input variable, overriding the catalog.
    #[serde(default)]
    pub index_variables: BTreeMap<String, String>,
}

impl Default for RunToml {
    fn default() -> Self {
        Self {
            models: default_models(),
            scenarios: default_scenarios(),
            variables: default_variables(),
            baseline_scenario: default_baseline_scenario(),
            indices: default_indices(),
            index_variables: BTreeMap::new(),
        }
    }
}

fn default_models() -> Vec<String> {
    [
        "CCCma-CanESM2_CCCma-CanRCM4",
        "CCCma-CanESM2_SMHI-RCA4",
        "CCCma-CanESM2_UQAM-CRCM5",
        "ICHEC-EC-EARTH_DMI-HIRHAM5",
        "ICHEC-EC-EARTH_SMHI-RCA4",
        "ICHEC-EC-EARTH_SMHI-RCA4-SN",
        "MPI-M-MPI-ESM-LR_MGO-RRCM",
        "MPI-M-MPI-ESM-LR_SMHI-RCA4",
        "MPI-M-MPI-ESM-LR_SMHI-RCA4-SN",
        "MPI-M-MPI-ESM-MR_UQAM-CRCM5",
        "NCC-NorESM1-M_SMHI-RCA4",
    ]
    .map(String::from)
    .to_vec()
}
fn default_scenarios() -> Vec<String> {
    ["hist", "rcp45", "rcp85"].map(String::from).to_vec()
}
fn default_variables() -> Vec<String> {
    ["pr", "prsn", "sfcWind", "tasmax", "tasmin"]
        .map(String::from)
        .to_vec()
}
fn default_baseline_scenario() -> String {
    "hist".to_string()
}
fn default_indices() -> BTreeMap<String, Vec<String>> {
    let table: [(&str, &[&str]); 5] = [
        ("pr", &["rx1day", "rx5day", "r10mm", "cwd", "cdd"]),
        ("prsn", &["hsd"]),
        ("tasmax", &["hd", "su", "wsdi"]),
        ("tasmin", &["cd", "dw", "csdi"]),
        ("sfcWind", &["wndd"]),
    ];
    table
        .into_iter()
        .map(|(var, ids)| (var.to_string(), ids.iter().map(|s| s.to_string()).collect()))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitsToml {
    #[serde(default = "default_temperature_units")]
    pub temperature: String,
    #[serde(default = "default_precipitation_units")]
    pub precipitation: String,
}

impl Default for UnitsToml {
    fn default() -> Self {
        Self {
            temperature: default_temperature_units(),
            precipitation: default_precipitation_units(),
        }
    }
}

fn default_temperature_units() -> String {
    "K".to_string()
}
fn default_precipitation_units() -> String {
    "kg m-2 s-1".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdsToml {
    /// Days either side of the calendar day pooled into each percentile.
    #[serde(default = "default_half_window")]
    pub half_window: usize,
    /// Pooled samples below which a threshold is NaN.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
}

impl Default for ThresholdsToml {
    fn default() -> Self {
        Self {
            half_window: default_half_window(),
            min_samples: default_min_samples(),
        }
    }
}

fn default_half_window() -> usize {
    2
}
fn default_min_samples() -> usize {
    10
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    #[serde(default = "default_parquet")]
    pub parquet: PathBuf,
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    /// Point summary JSON; skipped when unset.
    #[serde(default)]
    pub summary: Option<PathBuf>,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for OutputToml {
    fn default() -> Self {
        Self {
            parquet: default_parquet(),
            manifest: default_manifest(),
            summary: None,
            compression: default_compression(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_parquet() -> PathBuf {
    PathBuf::from("indices.parquet")
}
fn default_manifest() -> PathBuf {
    PathBuf::from("manifest.json")
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryToml {
    #[serde(default = "default_locations")]
    pub locations: Vec<LocationToml>,
    #[serde(default = "default_eras")]
    pub eras: Vec<PeriodToml>,
    /// Also summarise every decade present in the output.
    #[serde(default = "default_true")]
    pub decades: bool,
}

impl Default for SummaryToml {
    fn default() -> Self {
        Self {
            locations: default_locations(),
            eras: default_eras(),
            decades: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationToml {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeriodToml {
    pub label: String,
    pub start: i32,
    pub end: i32,
}

fn default_locations() -> Vec<LocationToml> {
    climdex_summary::default_locations()
        .into_iter()
        .map(|l| LocationToml {
            name: l.name,
            lat: l.lat,
            lon: l.lon,
        })
        .collect()
}
fn default_eras() -> Vec<PeriodToml> {
    climdex_summary::default_eras()
        .into_iter()
        .map(|p| PeriodToml {
            label: p.label().to_string(),
            start: p.start(),
            end: p.end(),
        })
        .collect()
}
fn default_true() -> bool {
    true
}
