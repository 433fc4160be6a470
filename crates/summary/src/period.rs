//! Inclusive year ranges used for aggregation.

use serde::Serialize;

use crate::error::SummaryError;

/// An inclusive range of years with a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    label: String,
    start: i32,
    end: i32,
}

impl Period {
    /// # Errors
    ///
    /// Returns [`SummaryError::InvalidPeriod`] if `start > end`.
    pub fn new(label: impl Into<String>, start: i32, end: i32) -> Result<Self, SummaryError> {
        let label = label.into();
        if start > end {
            return Err(SummaryError::InvalidPeriod { label, start, end });
        }
        Ok(Self { label, start, end })
    }

    /// The decade starting at `start_year` rounded down to a multiple of
    /// ten, labelled like `"2040s"`.
    pub fn decade(start_year: i32) -> Self {
        let start = start_year.div_euclid(10) * 10;
        Self {
            label: format!("{start}s"),
            start,
            end: start + 9,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

/// Thirty-year eras spanning the historical and projected record.
pub fn default_eras() -> Vec<Period> {
    [
        ("1980-2009", 1980, 2009),
        ("2010-2039", 2010, 2039),
        ("2040-2069", 2040, 2069),
        ("2070-2099", 2070, 2099),
    ]
    .into_iter()
    .map(|(label, start, end)| Period {
        label: label.to_string(),
        start,
        end,
    })
    .collect()
}

/// Every decade touched by `years`, in ascending order.
pub fn decades_covering(years: &[i32]) -> Vec<Period> {
    let (Some(&first), Some(&last)) = (years.iter().min(), years.iter().max()) else {
        return Vec::new();
    };
    let first = first.div_euclid(10);
    let last = last.div_euclid(10);
    (first..=last).map(|d| Period::decade(d * 10)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_reversed() {
        assert!(Period::new("ok", 2000, 2000).is_ok());
        assert!(matches!(
            Period::new("bad", 2001, 2000),
            Err(SummaryError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn decade_rounds_down() {
        let d = Period::decade(2047);
        assert_eq!(d.label(), "2040s");
        assert_eq!((d.start(), d.end()), (2040, 2049));
        assert!(d.contains(2049));
        assert!(!d.contains(2050));
    }

    #[test]
    fn decades_for_partial_record() {
        let years: Vec<i32> = (2006..=2021).collect();
        let labels: Vec<String> = decades_covering(&years)
            .iter()
            .map(|p| p.label().to_string())
            .collect();
        assert_eq!(labels, vec!["2000s", "2010s", "2020s"]);
        assert!(decades_covering(&[]).is_empty());
    }

    #[test]
    fn default_eras_are_contiguous() {
        let eras = default_eras();
        for pair in eras.windows(2) {
            assert_eq!(pair[0].end() + 1, pair[1].start());
        }
    }
}
