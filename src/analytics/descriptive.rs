use serde::Serialize;

use super::numeric::NumericSample;

/// Count and mean of a sample.
///
/// An empty sample reports `mean == 0.0` rather than NaN so callers can
/// display it directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
}

impl Summary {
    /// # Examples
    ///
    /// ```
    /// # use exoscope::analytics::descriptive::Summary;
    /// let summary = Summary::new([1.0, 2.0, 6.0]);
    /// assert_eq!(summary.count, 3);
    /// assert_eq!(summary.mean, 3.0);
    /// assert_eq!(Summary::new([]).mean, 0.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (count, sum) = values
            .into_iter()
            .fold((0usize, 0.0), |(n, s), v| (n + 1, s + v));
        let mean = if count == 0 { 0.0 } else { sum / count as f64 };
        Summary { count, sum, mean }
    }

    #[must_use]
    pub fn of(sample: &NumericSample) -> Self {
        Self::new(sample.values.iter().copied())
    }
}

/// Five-number summary plus mean and standard deviation, the inputs of a
/// box plot with a mean/sd marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl BoxSummary {
    /// Returns `None` for an empty sample.
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    /// Same as [`BoxSummary::new`] for values already in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let Summary { count, mean, .. } = Summary::new(sorted_values.iter().copied());
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / count as f64;

        Some(BoxSummary {
            count,
            min,
            q1: quantile(sorted_values, 0.25),
            median: quantile(sorted_values, 0.5),
            q3: quantile(sorted_values, 0.75),
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }

    #[must_use]
    pub fn of(sample: &NumericSample) -> Option<Self> {
        Self::new(sample.values.iter().copied())
    }
}

/// Quantile `q` (0.0–1.0) of sorted data, interpolating linearly between the
/// two closest ranks. Returns NaN for empty input.
#[must_use]
pub fn quantile(sorted_values: &[f64], q: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted_values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted_values[lo] + (sorted_values[hi] - sorted_values[lo]) * frac
}
