use std::fmt;

use crate::order;

/// Five-number summary of a set of fitness values.
///
/// Used to track how a population converges over generations: the minimum,
/// lower quartile, median, upper quartile and maximum of the fitness values.
/// Quartiles are computed with [`order::quantile_from_sorted`].
///
/// # Examples
///
/// ```
/// use banister_stats::summary::FitnessSummary;
///
/// let summary = FitnessSummary::new(&[1.0, 2.0, 3.0, 4.0, 5.0]);
/// assert_eq!(summary.q1, 2.0);
/// assert_eq!(summary.q3, 4.0);
/// assert_eq!(summary.to_string(), "Min: 1.000000\tMedian: 3.000000\t Max: 5.000000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessSummary {
    /// The smallest value.
    pub min: f64,
    /// The 25th percentile.
    pub q1: f64,
    /// The median.
    pub median: f64,
    /// The 75th percentile.
    pub q3: f64,
    /// The largest value.
    pub max: f64,
}

impl FitnessSummary {
    /// Column names matching [`Self::as_array`], for TSV reports.
    pub const COLUMNS: [&'static str; 5] = ["min", "q1", "median", "q3", "max"];

    /// Summarizes unsorted values.
    ///
    /// The values are copied and sorted internally. An empty input produces a
    /// summary of NaN values.
    #[must_use]
    pub fn new(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        order::sort(&mut sorted);
        Self::from_sorted(&sorted)
    }

    /// Summarizes values already sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Self {
        Self {
            min: order::quantile_from_sorted(sorted_values, 0.0),
            q1: order::quantile_from_sorted(sorted_values, 0.25),
            median: order::median_from_sorted(sorted_values),
            q3: order::quantile_from_sorted(sorted_values, 0.75),
            max: order::quantile_from_sorted(sorted_values, 1.0),
        }
    }

    /// Returns the summary as `[min, q1, median, q3, max]`.
    #[must_use]
    pub fn as_array(&self) -> [f64; 5] {
        [self.min, self.q1, self.median, self.q3, self.max]
    }
}

/// Formats the min/median/max triple used in progress logs.
impl fmt::Display for FitnessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Min: {:.6}\tMedian: {:.6}\t Max: {:.6}",
            self.min, self.median, self.max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_unsorted_values() {
        let values = [0.876, -0.505, 0.248, -0.595, 0.802, -0.332, 0.353, -0.464];
        let summary = FitnessSummary::new(&values);
        assert_eq!(summary.min, -0.595);
        assert_eq!(summary.max, 0.876);
        assert!((summary.q1 - -0.47425).abs() < 1e-9);
        assert!((summary.median - -0.042).abs() < 1e-9);
    }

    #[test]
    fn test_summary_of_empty_values() {
        let summary = FitnessSummary::new(&[]);
        assert!(summary.as_array().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_summary_with_negative_infinity() {
        let summary = FitnessSummary::new(&[f64::NEG_INFINITY, -2.0, -1.0]);
        assert_eq!(summary.min, f64::NEG_INFINITY);
        assert_eq!(summary.median, -2.0);
        assert_eq!(summary.max, -1.0);
    }
}
