//! Physical units of the input series.
//!
//! Fixed index thresholds are defined in °C, mm/day and m/s. They are
//! converted into the units of the input data once, when the catalog is
//! built; the data itself is never rescaled.

use std::str::FromStr;

use crate::error::IndexError;

const SECONDS_PER_DAY: f64 = 86_400.0;
const ZERO_CELSIUS_IN_KELVIN: f64 = 273.15;

/// Units of temperature variables (`tasmax`, `tasmin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnits {
    #[default]
    Kelvin,
    Celsius,
}

/// Units of precipitation variables (`pr`, `prsn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecipitationUnits {
    /// Mass flux, `kg m-2 s-1`.
    #[default]
    KgPerSquareMetrePerSecond,
    /// Daily total, `mm/day`.
    MillimetresPerDay,
}

impl FromStr for TemperatureUnits {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "K" | "k" | "kelvin" | "degK" => Ok(Self::Kelvin),
            "C" | "degC" | "celsius" | "°C" | "degree_Celsius" => Ok(Self::Celsius),
            other => Err(IndexError::UnknownUnits {
                quantity: "temperature",
                units: other.to_string(),
            }),
        }
    }
}

impl FromStr for PrecipitationUnits {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "kg m-2 s-1" | "kg/m2/s" | "kg m**-2 s**-1" => Ok(Self::KgPerSquareMetrePerSecond),
            "mm/day" | "mm d-1" | "mm day-1" | "mm" => Ok(Self::MillimetresPerDay),
            other => Err(IndexError::UnknownUnits {
                quantity: "precipitation",
                units: other.to_string(),
            }),
        }
    }
}

/// Units declared for the input series.
///
/// Wind speed is always m/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputUnits {
    pub temperature: TemperatureUnits,
    pub precipitation: PrecipitationUnits,
}

impl InputUnits {
    pub fn new(temperature: TemperatureUnits, precipitation: PrecipitationUnits) -> Self {
        Self {
            temperature,
            precipitation,
        }
    }

    /// A temperature in °C expressed in the input units.
    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self.temperature {
            TemperatureUnits::Kelvin => celsius + ZERO_CELSIUS_IN_KELVIN,
            TemperatureUnits::Celsius => celsius,
        }
    }

    /// A daily precipitation total in mm expressed in the input units.
    ///
    /// 1 mm of water over 1 m² is 1 kg, so mm/day divides by the seconds in
    /// a day to give the mean flux.
    pub fn from_mm_per_day(&self, mm: f64) -> f64 {
        match self.precipitation {
            PrecipitationUnits::KgPerSquareMetrePerSecond => mm / SECONDS_PER_DAY,
            PrecipitationUnits::MillimetresPerDay => mm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn celsius_conversion() {
        let kelvin = InputUnits::default();
        assert_relative_eq!(kelvin.from_celsius(25.0), 298.15);
        assert_relative_eq!(kelvin.from_celsius(-30.0), 243.15);
        let celsius = InputUnits::new(TemperatureUnits::Celsius, PrecipitationUnits::default());
        assert_relative_eq!(celsius.from_celsius(25.0), 25.0);
    }

    #[test]
    fn precipitation_conversion() {
        let flux = InputUnits::default();
        assert_relative_eq!(flux.from_mm_per_day(10.0), 10.0 / 86_400.0);
        let mm = InputUnits::new(
            TemperatureUnits::default(),
            PrecipitationUnits::MillimetresPerDay,
        );
        assert_relative_eq!(mm.from_mm_per_day(10.0), 10.0);
    }

    #[test]
    fn parse_units() {
        assert_eq!("K".parse::<TemperatureUnits>().unwrap(), TemperatureUnits::Kelvin);
        assert_eq!(
            "degC".parse::<TemperatureUnits>().unwrap(),
            TemperatureUnits::Celsius
        );
        assert_eq!(
            "kg m-2 s-1".parse::<PrecipitationUnits>().unwrap(),
            PrecipitationUnits::KgPerSquareMetrePerSecond
        );
        assert_eq!(
            "mm/day".parse::<PrecipitationUnits>().unwrap(),
            PrecipitationUnits::MillimetresPerDay
        );
        let err = "F".parse::<TemperatureUnits>().unwrap_err();
        assert_eq!(err.to_string(), "unrecognised temperature units: 'F'");
    }
}
