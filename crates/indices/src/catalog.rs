//! Registry of index definitions.

use crate::error::IndexError;
use crate::reduction::Reduction;
use crate::units::InputUnits;

/// Minimum spell length, in days, for warm/cold spell indices.
pub const SPELL_MIN_RUN: usize = 5;

/// Direction of a threshold exceedance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exceedance {
    /// Value strictly above the threshold.
    Above,
    /// Value strictly below the threshold.
    Below,
}

impl Exceedance {
    /// Strict comparison. NaN on either side never exceeds.
    #[inline]
    pub fn exceeds(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Above => value > threshold,
            Self::Below => value < threshold,
        }
    }
}

/// Parameters of a percentile-based spell-duration index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpellSpec {
    /// Calendar-day percentile of the baseline, in `(0, 100)`.
    pub percentile: f64,
    pub direction: Exceedance,
    /// Shortest run that counts.
    pub min_run: usize,
}

/// How an index turns daily values into an annual value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndexCategory {
    /// A reduction over each cell-year.
    Annual(Reduction),
    /// Days in qualifying spells relative to baseline thresholds.
    Spell(SpellSpec),
}

/// One registered index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    id: String,
    description: String,
    variable: String,
    category: IndexCategory,
}

impl IndexDefinition {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        variable: impl Into<String>,
        category: IndexCategory,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            variable: variable.into(),
            category,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Input variable the index is computed from.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn category(&self) -> &IndexCategory {
        &self.category
    }

    /// `true` for indices that need a baseline series.
    pub fn needs_baseline(&self) -> bool {
        matches!(self.category, IndexCategory::Spell(_))
    }
}

/// Immutable set of index definitions with unique ids.
///
/// ```
/// use climdex_indices::{IndexCatalog, InputUnits};
///
/// let catalog = IndexCatalog::new(InputUnits::default());
/// assert_eq!(catalog.lookup("hd").unwrap().variable(), "tasmax");
/// assert!(catalog.lookup("tx90p").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct IndexCatalog {
    units: InputUnits,
    definitions: Vec<IndexDefinition>,
}

impl IndexCatalog {
    /// The standard index set, with fixed thresholds in `units`.
    pub fn new(units: InputUnits) -> Self {
        use IndexCategory::{Annual, Spell};

        let t = |c: f64| units.from_celsius(c);
        let p = |mm: f64| units.from_mm_per_day(mm);
        let def = |id: &str, description: &str, variable: &str, category| {
            IndexDefinition::new(id, description, variable, category)
        };

        let definitions = vec![
            def("hd", "6th hottest day of the year", "tasmax", Annual(Reduction::NthLargest(6))),
            def("cd", "6th coldest day of the year", "tasmin", Annual(Reduction::NthSmallest(6))),
            def("rx1day", "Maximum 1-day precipitation", "pr", Annual(Reduction::Max)),
            def(
                "rx5day",
                "Maximum consecutive 5-day precipitation",
                "pr",
                Annual(Reduction::MaxWindowSum(5)),
            ),
            def(
                "hsd",
                "Mean of the 5 heaviest snowfall days",
                "prsn",
                Annual(Reduction::MeanOfLargest(5)),
            ),
            def("su", "Summer days (> 25 °C)", "tasmax", Annual(Reduction::CountAbove(t(25.0)))),
            def(
                "dw",
                "Deep winter days (< -30 °C)",
                "tasmin",
                Annual(Reduction::CountBelow(t(-30.0))),
            ),
            def(
                "r10mm",
                "Heavy precipitation days (> 10 mm)",
                "pr",
                Annual(Reduction::CountAbove(p(10.0))),
            ),
            def(
                "cwd",
                "Consecutive wet days (> 1 mm)",
                "pr",
                Annual(Reduction::LongestRunAbove(p(1.0))),
            ),
            def(
                "cdd",
                "Consecutive dry days (< 1 mm)",
                "pr",
                Annual(Reduction::LongestRunBelow(p(1.0))),
            ),
            def(
                "wndd",
                "Windy days (> 10 m/s)",
                "sfcWind",
                Annual(Reduction::CountAbove(10.0)),
            ),
            def(
                "wsdi",
                "Warm spell duration index",
                "tasmax",
                Spell(SpellSpec {
                    percentile: 90.0,
                    direction: Exceedance::Above,
                    min_run: SPELL_MIN_RUN,
                }),
            ),
            def(
                "csdi",
                "Cold spell duration index",
                "tasmin",
                Spell(SpellSpec {
                    percentile: 10.0,
                    direction: Exceedance::Below,
                    min_run: SPELL_MIN_RUN,
                }),
            ),
        ];
        Self { units, definitions }
    }

    /// Overrides the input variable of one index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::UnknownIndex`] if `index_id` is not registered.
    pub fn with_required_variable(
        mut self,
        index_id: &str,
        variable: impl Into<String>,
    ) -> Result<Self, IndexError> {
        let def = self
            .definitions
            .iter_mut()
            .find(|d| d.id == index_id)
            .ok_or_else(|| IndexError::UnknownIndex {
                index_id: index_id.to_string(),
            })?;
        def.variable = variable.into();
        Ok(self)
    }

    /// Looks up an index by id.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::UnknownIndex`] if `index_id` is not registered.
    pub fn lookup(&self, index_id: &str) -> Result<&IndexDefinition, IndexError> {
        self.definitions
            .iter()
            .find(|d| d.id == index_id)
            .ok_or_else(|| IndexError::UnknownIndex {
                index_id: index_id.to_string(),
            })
    }

    /// Index ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.id.as_str())
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> &[IndexDefinition] {
        &self.definitions
    }

    /// Definitions computed from `variable`, in registration order.
    pub fn indices_for_variable(&self, variable: &str) -> Vec<&IndexDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.variable == variable)
            .collect()
    }

    pub fn units(&self) -> &InputUnits {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
