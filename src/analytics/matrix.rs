//! Label count matrices: predicted versus true class tallies.
//!
//! Every matrix uses one convention: rows are predicted labels, columns are
//! true labels, both in [`Label::ALL`] order. Matrices supplied in another
//! layout are normalized on the way in.

use serde::Serialize;

use crate::data::label::Label;
use crate::data::outcome::ClassificationOutcome;
use crate::error::{AnalyticsError, Result};

/// How a supplied matrix lays out its axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `m[predicted][true]`.
    PredictedRows,
    /// `m[true][predicted]`, as produced by scikit-learn.
    TruthRows,
}

/// Label order of the prediction backend's matrix (label-encoder order).
pub const BACKEND_LABEL_ORDER: [Label; 3] =
    [Label::Candidate, Label::Confirmed, Label::FalsePositive];

/// A 3×3 count matrix indexed `[predicted][true]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelCountMatrix {
    counts: [[u64; 3]; 3],
}

impl LabelCountMatrix {
    /// Tally outcomes one by one. Outcomes without a truth label are not
    /// counted.
    pub fn from_outcomes(outcomes: &[ClassificationOutcome]) -> Self {
        let mut matrix = LabelCountMatrix::default();
        for outcome in outcomes {
            if let Some(truth) = outcome.truth {
                matrix.counts[outcome.predicted.index()][truth.index()] += 1;
            }
        }
        matrix
    }

    /// Normalize a supplied matrix whose axes follow `order` and
    /// `orientation`.
    pub fn from_reference(
        matrix: &[Vec<u64>],
        order: [Label; 3],
        orientation: Orientation,
    ) -> Result<Self> {
        let shape_error = || AnalyticsError::MatrixShape {
            rows: matrix.len(),
            cols: matrix.iter().map(Vec::len).max().unwrap_or(0),
        };
        if matrix.len() != 3 || matrix.iter().any(|row| row.len() != 3) {
            return Err(shape_error());
        }

        let mut out = LabelCountMatrix::default();
        for (r, row) in matrix.iter().enumerate() {
            for (c, &count) in row.iter().enumerate() {
                let (predicted, truth) = match orientation {
                    Orientation::PredictedRows => (order[r], order[c]),
                    Orientation::TruthRows => (order[c], order[r]),
                };
                out.counts[predicted.index()][truth.index()] += count;
            }
        }
        Ok(out)
    }

    /// Normalize the backend's `confusion_matrix` field.
    pub fn from_backend(matrix: &[Vec<u64>]) -> Result<Self> {
        Self::from_reference(matrix, BACKEND_LABEL_ORDER, Orientation::TruthRows)
    }

    pub fn get(&self, predicted: Label, truth: Label) -> u64 {
        self.counts[predicted.index()][truth.index()]
    }

    /// Raw counts, `[predicted][true]` in [`Label::ALL`] order.
    pub fn counts(&self) -> &[[u64; 3]; 3] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Sum of the diagonal.
    pub fn correct(&self) -> u64 {
        (0..3).map(|i| self.counts[i][i]).sum()
    }

    /// `correct / total`, or 0 for an empty matrix.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    /// Count of rows per predicted label.
    pub fn predicted_totals(&self) -> [u64; 3] {
        self.counts.map(|row| row.iter().sum())
    }

    /// Count of rows per true label.
    pub fn truth_totals(&self) -> [u64; 3] {
        let mut totals = [0; 3];
        for row in &self.counts {
            for (t, count) in totals.iter_mut().zip(row) {
                *t += count;
            }
        }
        totals
    }

    /// Precision, recall and F1 for every label, plus macro averages.
    pub fn class_metrics(&self) -> MetricsReport {
        let predicted = self.predicted_totals();
        let truth = self.truth_totals();
        let per_class: Vec<ClassMetrics> = Label::ALL
            .iter()
            .map(|&label| {
                let i = label.index();
                let hits = self.counts[i][i];
                let precision = ratio(hits, predicted[i]);
                let recall = ratio(hits, truth[i]);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    label,
                    precision,
                    recall,
                    f1,
                    support: truth[i],
                }
            })
            .collect();

        let n = per_class.len() as f64;
        MetricsReport {
            accuracy: self.accuracy(),
            macro_precision: per_class.iter().map(|m| m.precision).sum::<f64>() / n,
            macro_recall: per_class.iter().map(|m| m.recall).sum::<f64>() / n,
            macro_f1: per_class.iter().map(|m| m.f1).sum::<f64>() / n,
            per_class,
        }
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Per-label classification quality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: Label,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Rows whose true label is `label`.
    pub support: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub accuracy: f64,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
    pub per_class: Vec<ClassMetrics>,
}

/// Serialized form handed to renderers: explicit axis labels plus totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixView {
    pub row_axis: &'static str,
    pub column_axis: &'static str,
    pub row_labels: [Label; 3],
    pub column_labels: [Label; 3],
    pub counts: [[u64; 3]; 3],
    pub total: u64,
    pub correct: u64,
    pub accuracy: f64,
}

impl From<&LabelCountMatrix> for MatrixView {
    fn from(matrix: &LabelCountMatrix) -> Self {
        MatrixView {
            row_axis: "predicted",
            column_axis: "true",
            row_labels: Label::ALL,
            column_labels: Label::ALL,
            counts: matrix.counts,
            total: matrix.total(),
            correct: matrix.correct(),
            accuracy: matrix.accuracy(),
        }
    }
}
