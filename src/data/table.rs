use serde::{Deserialize, Serialize};

use super::label::Label;
use super::model::Dataset;
use super::outcome::ClassificationOutcome;
use crate::error::{AnalyticsError, Result};

/// Parse a raw cell as a finite floating-point number.
///
/// Accepts anything Rust's `f64` parser accepts after trimming (`"1.2e3"`,
/// `"-0.5"`, `".5"`), then rejects infinities and NaN.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Outcome of looking up a numeric feature in one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericCell {
    /// Null cell, unknown feature or absent key.
    Missing,
    /// Present but not a finite number.
    Invalid,
    Value(f64),
}

impl NumericCell {
    pub fn value(self) -> Option<f64> {
        match self {
            NumericCell::Value(v) => Some(v),
            _ => None,
        }
    }

    fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => NumericCell::Missing,
            Some(s) => parse_number(s).map_or(NumericCell::Invalid, NumericCell::Value),
        }
    }
}

/// Which of a row's label columns to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelColumn {
    Predicted,
    Truth,
}

/// Row-oriented access shared by raw datasets and prediction outcomes.
///
/// Every aggregation is written once against this trait, so the standalone
/// dataset explorer and the batch-results views run the same code.
pub trait LabeledTable {
    fn row_count(&self) -> usize;

    /// Numeric value of `feature` in `row`.
    fn cell(&self, row: usize, feature: &str) -> NumericCell;

    /// Label of `row` in the requested column, if present and recognized.
    fn label(&self, row: usize, column: LabelColumn) -> Option<Label>;
}

impl LabeledTable for Dataset {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn cell(&self, row: usize, feature: &str) -> NumericCell {
        NumericCell::from_raw(self.value(row, feature))
    }

    fn label(&self, _row: usize, _column: LabelColumn) -> Option<Label> {
        None
    }
}

impl LabeledTable for [ClassificationOutcome] {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn cell(&self, row: usize, feature: &str) -> NumericCell {
        self.get(row)
            .and_then(|o| o.feature(feature))
            .map_or(NumericCell::Missing, NumericCell::Value)
    }

    fn label(&self, row: usize, column: LabelColumn) -> Option<Label> {
        let outcome = self.get(row)?;
        match column {
            LabelColumn::Predicted => Some(outcome.predicted),
            LabelColumn::Truth => outcome.truth,
        }
    }
}

impl LabeledTable for Vec<ClassificationOutcome> {
    fn row_count(&self) -> usize {
        self.as_slice().row_count()
    }

    fn cell(&self, row: usize, feature: &str) -> NumericCell {
        self.as_slice().cell(row, feature)
    }

    fn label(&self, row: usize, column: LabelColumn) -> Option<Label> {
        self.as_slice().label(row, column)
    }
}

/// A dataset paired with the columns that hold its labels.
///
/// The Kepler cumulative table carries only `koi_disposition`, which is
/// mounted as the truth column; prediction exports add a predicted column.
#[derive(Debug, Clone, Copy)]
pub struct LabeledDataset<'a> {
    dataset: &'a Dataset,
    predicted: Option<usize>,
    truth: Option<usize>,
}

impl<'a> LabeledDataset<'a> {
    pub fn new(
        dataset: &'a Dataset,
        predicted_column: Option<&str>,
        truth_column: Option<&str>,
    ) -> Result<Self> {
        let resolve = |column: Option<&str>| -> Result<Option<usize>> {
            column
                .map(|c| {
                    dataset
                        .field_index(c)
                        .ok_or_else(|| AnalyticsError::MissingColumn(c.to_string()))
                })
                .transpose()
        };
        Ok(LabeledDataset {
            dataset,
            predicted: resolve(predicted_column)?,
            truth: resolve(truth_column)?,
        })
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }
}

impl LabeledTable for LabeledDataset<'_> {
    fn row_count(&self) -> usize {
        self.dataset.len()
    }

    fn cell(&self, row: usize, feature: &str) -> NumericCell {
        self.dataset.cell(row, feature)
    }

    fn label(&self, row: usize, column: LabelColumn) -> Option<Label> {
        let idx = match column {
            LabelColumn::Predicted => self.predicted?,
            LabelColumn::Truth => self.truth?,
        };
        self.dataset
            .records()
            .get(row)?
            .get(idx)
            .and_then(Label::parse)
    }
}
