use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analytics::correlation::{DEFAULT_MIN_PAIR_ROWS, DEFAULT_MIN_VALID_COUNT};
use crate::error::Result;
use crate::state::MissingSort;

/// Numeric features of the Kepler cumulative table examined by default.
pub const KOI_FEATURES: [&str; 10] = [
    "koi_period",
    "koi_depth",
    "koi_duration",
    "koi_prad",
    "koi_steff",
    "koi_model_snr",
    "koi_insol",
    "koi_teq",
    "koi_srad",
    "koi_impact",
];

/// Tunables of the analytics engine.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// { "num_bins": 12, "min_valid_count": 50 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Histogram bin count.
    pub num_bins: usize,
    /// Minimum valid values for a feature to enter the correlation matrix.
    pub min_valid_count: usize,
    /// Minimum complete-case rows for a correlation entry.
    pub min_pair_rows: usize,
    /// Where rows lacking the sort value go in the predictions table.
    pub missing_sort: MissingSort,
    /// Column holding model predictions in a CSV export.
    pub predicted_column: String,
    /// Column holding ground-truth labels in a CSV export.
    pub truth_column: String,
    /// Column holding archive dispositions in the raw Kepler table.
    pub disposition_column: String,
    /// Features examined by statistics, histograms and correlation.
    pub features: Vec<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            num_bins: 10,
            min_valid_count: DEFAULT_MIN_VALID_COUNT,
            min_pair_rows: DEFAULT_MIN_PAIR_ROWS,
            missing_sort: MissingSort::default(),
            predicted_column: "predicted_label".to_string(),
            truth_column: "true_label".to_string(),
            disposition_column: "koi_disposition".to_string(),
            features: KOI_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AnalyticsConfig {
    /// Read a JSON config file; absent keys keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
