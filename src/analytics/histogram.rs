use serde::Serialize;

use super::numeric::NumericSample;
use crate::error::{AnalyticsError, Result};

/// An equal-width histogram over `[min, max]` of a sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

/// A single histogram bin.
///
/// Covers `[start, end)`, except the last bin which also includes `end`
/// (the sample maximum).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
    /// `"start-end"` with one decimal place.
    pub label: String,
}

impl Bin {
    fn new(start: f64, end: f64) -> Self {
        Bin {
            start,
            end,
            count: 0,
            label: format!("{start:.1}-{end:.1}"),
        }
    }
}

impl Histogram {
    /// A histogram with no bins, used where a class has no values.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Bin `sample` into `num_bins` equal-width bins spanning its range.
    ///
    /// Each value goes to bin `min(floor((v - min) / width), num_bins - 1)`,
    /// so the maximum lands in the last bin. When every value is equal the
    /// range has zero width and a single bin `[v, v]` holds the whole sample.
    ///
    /// # Examples
    ///
    /// ```
    /// # use exoscope::analytics::histogram::Histogram;
    /// let values = (1..=10).map(f64::from);
    /// let histogram = Histogram::new("x", values, 5).unwrap();
    /// assert_eq!(histogram.bins.len(), 5);
    /// assert_eq!(histogram.bins[4].label, "8.2-10.0");
    /// assert_eq!(histogram.bins[4].count, 2);
    /// ```
    pub fn new<I>(feature: &str, values: I, num_bins: usize) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        if num_bins == 0 {
            return Err(AnalyticsError::InvalidBinCount(num_bins));
        }
        let values = values.into_iter().collect::<Vec<_>>();
        let (Some(min), Some(max)) = (
            values.iter().copied().reduce(f64::min),
            values.iter().copied().reduce(f64::max),
        ) else {
            return Err(AnalyticsError::EmptySample {
                feature: feature.to_string(),
            });
        };

        if max - min == 0.0 {
            let mut bin = Bin::new(min, max);
            bin.count = values.len() as u64;
            return Ok(Histogram { bins: vec![bin] });
        }

        // Work on halved values when the range overflows `f64`.
        let scale = if (max - min).is_finite() { 1.0 } else { 0.5 };
        let width = (max * scale - min * scale) / num_bins as f64;
        let edge = |i: usize| (min * scale + i as f64 * width) / scale;
        let mut bins = (0..num_bins)
            .map(|i| {
                // Pin the last edge to the sample maximum.
                let end = if i == num_bins - 1 { max } else { edge(i + 1) };
                Bin::new(edge(i), end)
            })
            .collect::<Vec<_>>();

        for value in values {
            let offset = ((value * scale - min * scale) / width).floor();
            let idx = if offset.is_nan() {
                num_bins - 1
            } else {
                (offset as usize).min(num_bins - 1)
            };
            bins[idx].count += 1;
        }

        Ok(Histogram { bins })
    }

    /// Histogram of a [`NumericSample`].
    pub fn of(sample: &NumericSample, num_bins: usize) -> Result<Self> {
        Self::new(&sample.feature, sample.values.iter().copied(), num_bins)
    }

    /// Like [`Histogram::of`], but an empty sample yields an empty histogram
    /// instead of an error. A zero bin count is still rejected.
    pub fn of_or_empty(sample: &NumericSample, num_bins: usize) -> Result<Self> {
        match Self::of(sample, num_bins) {
            Err(AnalyticsError::EmptySample { feature }) => {
                log::debug!("{feature}: no values to bin");
                Ok(Self::empty())
            }
            other => other,
        }
    }

    /// Total number of binned values.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.bins.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|b| b.count).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_equal_width_bins() {
        let values = (1..=10).map(f64::from);
        let histogram = Histogram::new("x", values, 5).unwrap();
        assert_eq!(histogram.bins.len(), 5);
        for bin in &histogram.bins {
            assert_relative_eq!(bin.end - bin.start, 1.8, epsilon = 1e-9);
        }
        assert_eq!(histogram.counts(), vec![2, 2, 2, 2, 2]);
        assert_eq!(histogram.labels()[0], "1.0-2.8");
        let last = histogram.bins.last().unwrap();
        assert_relative_eq!(last.start, 8.2, epsilon = 1e-9);
        assert_eq!(last.end, 10.0);
        assert_eq!(last.count, 2);
    }

    #[test]
    fn test_counts_sum_to_sample_size() {
        let values = [0.3, 12.0, 5.5, 5.5, 7.25, 0.3, 11.9, 3.0];
        let histogram = Histogram::new("x", values, 12).unwrap();
        assert_eq!(histogram.bins.len(), 12);
        assert_eq!(histogram.total(), values.len() as u64);
        // The maximum belongs to the last bin.
        assert!(histogram.bins.last().unwrap().count >= 1);
    }

    #[test]
    fn test_each_value_in_its_bin() {
        let values = [-4.0, -1.5, 0.0, 2.2, 9.9, 10.0];
        let histogram = Histogram::new("x", values, 4).unwrap();
        let last = histogram.bins.len() - 1;
        for v in values {
            let holders = histogram
                .bins
                .iter()
                .enumerate()
                .filter(|(i, b)| v >= b.start && (v < b.end || (*i == last && v <= b.end)))
                .count();
            assert_eq!(holders, 1, "value {v} must fall in exactly one bin");
        }
    }

    #[test]
    fn test_range_wider_than_f64_max() {
        let histogram = Histogram::new("x", [-1e308, 0.0, 1e308], 4).unwrap();
        assert_eq!(histogram.counts(), vec![1, 0, 1, 1]);
        assert_eq!(histogram.bins[0].start, -1e308);
        assert_eq!(histogram.bins[2].start, 0.0);
        assert_eq!(histogram.bins[3].end, 1e308);
        assert!(histogram
            .bins
            .iter()
            .all(|b| b.start.is_finite() && b.end.is_finite()));
    }

    #[test]
    fn test_degenerate_single_point() {
        let histogram = Histogram::new("x", [4.0, 4.0, 4.0], 10).unwrap();
        assert_eq!(histogram.bins.len(), 1);
        assert_eq!(histogram.bins[0].count, 3);
        assert_eq!(histogram.bins[0].label, "4.0-4.0");
    }

    #[test]
    fn test_rejects_zero_bins() {
        let err = Histogram::new("x", [1.0, 2.0], 0).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidBinCount(0)));
    }

    #[test]
    fn test_rejects_empty_sample() {
        let err = Histogram::new("koi_prad", [], 5).unwrap_err();
        assert!(matches!(err, AnalyticsError::EmptySample { ref feature } if feature == "koi_prad"));
    }

    #[test]
    fn test_of_or_empty() {
        let sample = NumericSample {
            feature: "koi_prad".into(),
            ..NumericSample::default()
        };
        assert!(Histogram::of_or_empty(&sample, 5).unwrap().is_empty());
        assert!(Histogram::of_or_empty(&sample, 0).is_err());
    }
}
