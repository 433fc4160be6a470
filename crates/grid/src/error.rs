//! Error types for the climdex-grid crate.

/// Error type for grid construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Returned when latitude and longitude arrays differ in shape.
    #[error("coordinate shape mismatch: lat is {lat:?}, lon is {lon:?}")]
    CoordShapeMismatch {
        /// Shape of the latitude array.
        lat: (usize, usize),
        /// Shape of the longitude array.
        lon: (usize, usize),
    },

    /// Returned when the spatial shape of the values differs from the coordinates.
    #[error("spatial shape mismatch: values are {values:?}, coordinates are {coords:?}")]
    SpatialShapeMismatch {
        /// `(rows, cols)` of the value array.
        values: (usize, usize),
        /// `(rows, cols)` of the coordinate arrays.
        coords: (usize, usize),
    },

    /// Returned when the time axis and the leading value axis differ in length.
    #[error("time axis has {times} steps but values have {values}")]
    TimeLengthMismatch {
        /// Number of dates.
        times: usize,
        /// Length of the leading value axis.
        values: usize,
    },

    /// Returned when the time axis is not strictly increasing.
    #[error("time axis not strictly increasing at index {index}: {previous} then {current}")]
    TimesNotIncreasing {
        /// Position of the offending date.
        index: usize,
        /// The preceding date, `YYYY-MM-DD`.
        previous: String,
        /// The offending date, `YYYY-MM-DD`.
        current: String,
    },

    /// Returned when the year labels and the leading value axis differ in length.
    #[error("{years} year labels but values have {values}")]
    YearLengthMismatch {
        /// Number of year labels.
        years: usize,
        /// Length of the leading value axis.
        values: usize,
    },

    /// Returned when year labels are not strictly ascending.
    #[error("years not strictly ascending at index {index}")]
    YearsNotAscending {
        /// Position of the offending year.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_coord_shape_mismatch() {
        let err = GridError::CoordShapeMismatch {
            lat: (2, 3),
            lon: (3, 2),
        };
        assert_eq!(
            err.to_string(),
            "coordinate shape mismatch: lat is (2, 3), lon is (3, 2)"
        );
    }

    #[test]
    fn error_time_length_mismatch() {
        let err = GridError::TimeLengthMismatch {
            times: 10,
            values: 9,
        };
        assert_eq!(err.to_string(), "time axis has 10 steps but values have 9");
    }

    #[test]
    fn error_times_not_increasing() {
        let err = GridError::TimesNotIncreasing {
            index: 4,
            previous: "2000-01-05".to_string(),
            current: "2000-01-05".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "time axis not strictly increasing at index 4: 2000-01-05 then 2000-01-05"
        );
    }

    #[test]
    fn error_years_not_ascending() {
        let err = GridError::YearsNotAscending { index: 1 };
        assert_eq!(err.to_string(), "years not strictly ascending at index 1");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<GridError>();
    }
}
