//! Analytics engine behind the exoplanet classification dashboard.
//!
//! Ingests the Kepler cumulative table or a batch of model predictions and
//! produces the numeric series the dashboard draws: summaries, histograms,
//! correlation matrices, class-conditioned breakdowns, label count matrices
//! and a sortable view of the predictions table.
//!
//! ```
//! use exoscope::data::loader::parse_csv;
//! use exoscope::analytics::histogram::Histogram;
//! use exoscope::analytics::numeric::NumericSample;
//!
//! let ds = parse_csv("koi_prad\n1.2\n2.5\nn/a\n11.0").unwrap();
//! let sample = NumericSample::extract(&ds, "koi_prad");
//! assert_eq!(sample.len(), 3);
//! let histogram = Histogram::of(&sample, 4).unwrap();
//! assert_eq!(histogram.total(), 3);
//! ```

pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod state;

pub use error::{AnalyticsError, Result};
