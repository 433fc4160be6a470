//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use crate::config::*;

use climdex_calendar::Calendar;
use climdex_indices::{
    IndexCatalog, InputUnits, PrecipitationUnits, TemperatureUnits, WorkUnit,
};
use climdex_io::{Compression, ReaderConfig, WriterConfig};
use climdex_summary::{Location, Period};
use climdex_thresholds::ThresholdConfig;

const TEMPLATE_PLACEHOLDERS: [&str; 3] = ["{variable}", "{model}", "{scenario}"];

/// Builds a [`ReaderConfig`] from the TOML input configuration.
pub fn build_reader_config(input: &InputToml) -> Result<ReaderConfig> {
    for placeholder in TEMPLATE_PLACEHOLDERS {
        if !input.template.contains(placeholder) {
            bail!(
                "input template {:?} is missing the {placeholder} placeholder",
                input.template
            );
        }
    }
    let calendar = Calendar::from_cf(&input.default_calendar)
        .with_context(|| format!("invalid default_calendar {:?}", input.default_calendar))?;
    let cfg = ReaderConfig::default()
        .with_time_var(&input.time_var)
        .with_default_calendar(calendar);
    cfg.validate()?;
    Ok(cfg)
}

/// Fills the input template for one file.
pub fn render_template(template: &str, variable: &str, model: &str, scenario: &str) -> String {
    template
        .replace("{variable}", variable)
        .replace("{model}", model)
        .replace("{scenario}", scenario)
}

/// Parses the declared input units.
pub fn build_input_units(units: &UnitsToml) -> Result<InputUnits> {
    let temperature: TemperatureUnits = units.temperature.parse()?;
    let precipitation: PrecipitationUnits = units.precipitation.parse()?;
    Ok(InputUnits::new(temperature, precipitation))
}

/// Builds the [`IndexCatalog`], applying per-index variable overrides.
pub fn build_catalog(units: &UnitsToml, run: &RunToml) -> Result<IndexCatalog> {
    let mut catalog = IndexCatalog::new(build_input_units(units)?);
    for (index_id, variable) in &run.index_variables {
        catalog = catalog
            .with_required_variable(index_id, variable)
            .with_context(|| format!("invalid [run].index_variables entry {index_id:?}"))?;
    }
    Ok(catalog)
}

/// Builds a validated [`ThresholdConfig`].
pub fn build_threshold_config(thresholds: &ThresholdsToml) -> Result<ThresholdConfig> {
    let cfg = ThresholdConfig::new()
        .with_half_window(thresholds.half_window)
        .with_min_samples(thresholds.min_samples);
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`WriterConfig`] from the TOML output configuration.
pub fn build_writer_config(output: &OutputToml) -> Result<WriterConfig> {
    let compression: Compression = output.compression.parse()?;
    let cfg = WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(output.row_group_size);
    cfg.validate()?;
    Ok(cfg)
}

/// Expands models x scenarios x variables into work units.
///
/// Variables without an entry in `[run].indices` are skipped.
pub fn build_work_units(run: &RunToml) -> Vec<WorkUnit> {
    let mut units = Vec::new();
    for model in &run.models {
        for scenario in &run.scenarios {
            for variable in &run.variables {
                let Some(index_ids) = run.indices.get(variable) else {
                    continue;
                };
                if index_ids.is_empty() {
                    continue;
                }
                units.push(WorkUnit {
                    model: model.clone(),
                    scenario: scenario.clone(),
                    variable: variable.clone(),
                    index_ids: index_ids.clone(),
                });
            }
        }
    }
    units
}

/// Converts configured locations, validating coordinates.
pub fn build_locations(summary: &SummaryToml) -> Result<Vec<Location>> {
    summary
        .locations
        .iter()
        .map(|l| Location::new(&l.name, l.lat, l.lon).map_err(Into::into))
        .collect()
}

/// Converts configured eras, validating year order.
pub fn build_eras(summary: &SummaryToml) -> Result<Vec<Period>> {
    summary
        .eras
        .iter()
        .map(|p| Period::new(&p.label, p.start, p.end).map_err(Into::into))
        .collect()
}
