//! Class-conditioned aggregation.
//!
//! Rows are partitioned by one label column, then each partition is fed
//! through the unconditioned primitives (extraction, summaries, histograms,
//! correlation) independently.

use std::collections::BTreeMap;

use serde::Serialize;

use super::correlation::CorrelationMatrix;
use super::descriptive::{BoxSummary, Summary};
use super::histogram::Histogram;
use super::numeric::{paired_values, NumericSample};
use crate::config::AnalyticsConfig;
use crate::data::filter::partition_by_label;
use crate::data::label::Label;
use crate::data::table::{LabelColumn, LabeledTable, NumericCell};
use crate::error::Result;

/// Count and share of one label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelShare {
    pub label: Label,
    pub count: usize,
    /// `count / labeled rows`, 0 when nothing is labeled.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub label: Label,
    pub summary: Summary,
    pub box_summary: Option<BoxSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassHistogram {
    pub label: Label,
    pub histogram: Histogram,
}

/// Complete-case points of one class for a scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassScatter {
    pub label: Label,
    pub points: Vec<(f64, f64)>,
}

/// Rows of a table grouped by the labels in one column.
#[derive(Debug)]
pub struct ClassBreakdown<'a, T: ?Sized> {
    table: &'a T,
    column: LabelColumn,
    groups: BTreeMap<Label, Vec<usize>>,
}

impl<'a, T> ClassBreakdown<'a, T>
where
    T: LabeledTable + ?Sized,
{
    pub fn new(table: &'a T, column: LabelColumn) -> Self {
        let groups = partition_by_label(table, column);
        ClassBreakdown {
            table,
            column,
            groups,
        }
    }

    pub fn column(&self) -> LabelColumn {
        self.column
    }

    /// Source row indices of one class.
    pub fn rows(&self, label: Label) -> &[usize] {
        self.groups.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rows carrying any recognized label.
    pub fn labeled_rows(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Class distribution in [`Label::ALL`] order.
    pub fn shares(&self) -> Vec<LabelShare> {
        let labeled = self.labeled_rows();
        Label::ALL
            .iter()
            .map(|&label| {
                let count = self.rows(label).len();
                let share = if labeled == 0 {
                    0.0
                } else {
                    count as f64 / labeled as f64
                };
                LabelShare {
                    label,
                    count,
                    share,
                }
            })
            .collect()
    }

    /// Valid values of `feature` within one class.
    pub fn sample(&self, label: Label, feature: &str) -> NumericSample {
        NumericSample::extract_rows(self.table, self.rows(label).iter().copied(), feature)
    }

    /// Count/mean and box summary of `feature` per class.
    pub fn summaries(&self, feature: &str) -> Vec<ClassSummary> {
        Label::ALL
            .iter()
            .map(|&label| {
                let sample = self.sample(label, feature);
                ClassSummary {
                    label,
                    summary: Summary::of(&sample),
                    box_summary: BoxSummary::of(&sample),
                }
            })
            .collect()
    }

    /// Histogram of `feature` per class, each over its own range. A class
    /// without values gets an empty histogram.
    pub fn histograms(&self, feature: &str, num_bins: usize) -> Result<Vec<ClassHistogram>> {
        Label::ALL
            .iter()
            .map(|&label| {
                let sample = self.sample(label, feature);
                Ok(ClassHistogram {
                    label,
                    histogram: Histogram::of_or_empty(&sample, num_bins)?,
                })
            })
            .collect()
    }

    /// `(x, y)` points per class, keeping rows where both features are valid.
    pub fn scatter(&self, x: &str, y: &str) -> Vec<ClassScatter> {
        Label::ALL
            .iter()
            .map(|&label| ClassScatter {
                label,
                points: paired_values(self.table, self.rows(label).iter().copied(), x, y),
            })
            .collect()
    }

    /// Correlation matrix restricted to one class.
    pub fn correlation(
        &self,
        label: Label,
        candidates: &[String],
        config: &AnalyticsConfig,
    ) -> CorrelationMatrix {
        let subset = Subset {
            table: self.table,
            rows: self.rows(label),
        };
        CorrelationMatrix::new(&subset, candidates, config)
    }
}

/// A row subset presented as a table of its own.
struct Subset<'a, T: ?Sized> {
    table: &'a T,
    rows: &'a [usize],
}

impl<T> LabeledTable for Subset<'_, T>
where
    T: LabeledTable + ?Sized,
{
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, row: usize, feature: &str) -> NumericCell {
        self.rows
            .get(row)
            .map_or(NumericCell::Missing, |&r| self.table.cell(r, feature))
    }

    fn label(&self, row: usize, column: LabelColumn) -> Option<Label> {
        self.table.label(*self.rows.get(row)?, column)
    }
}

// ---------------------------------------------------------------------------
// Overview – headline numbers of a table
// ---------------------------------------------------------------------------

/// Headline figures: total rows, rows per class and per-feature means.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total: usize,
    pub classes: Vec<LabelShare>,
    pub means: BTreeMap<String, Summary>,
}

impl Overview {
    pub fn new<T>(table: &T, column: LabelColumn, features: &[String]) -> Self
    where
        T: LabeledTable + ?Sized,
    {
        let breakdown = ClassBreakdown::new(table, column);
        let means = features
            .iter()
            .map(|f| (f.clone(), Summary::of(&NumericSample::extract(table, f))))
            .collect();
        Overview {
            total: table.row_count(),
            classes: breakdown.shares(),
            means,
        }
    }

    pub fn count(&self, label: Label) -> usize {
        self.classes
            .iter()
            .find(|s| s.label == label)
            .map_or(0, |s| s.count)
    }
}
