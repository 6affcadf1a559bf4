use serde::Serialize;

use crate::data::table::{LabeledTable, NumericCell};

/// The valid values of one feature, each tagged with the source row it came
/// from.
///
/// `values[i]` was read from row `rows[i]`; order follows the source rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NumericSample {
    pub feature: String,
    pub values: Vec<f64>,
    pub rows: Vec<usize>,
    /// Rows whose cell was null or absent.
    pub missing: usize,
    /// Rows whose cell was present but not a finite number.
    pub invalid: usize,
}

impl NumericSample {
    /// Extract `feature` from every row of `table`.
    pub fn extract<T>(table: &T, feature: &str) -> Self
    where
        T: LabeledTable + ?Sized,
    {
        Self::extract_rows(table, 0..table.row_count(), feature)
    }

    /// Extract `feature` from a subset of rows, in the order given.
    pub fn extract_rows<T, I>(table: &T, rows: I, feature: &str) -> Self
    where
        T: LabeledTable + ?Sized,
        I: IntoIterator<Item = usize>,
    {
        let mut sample = NumericSample {
            feature: feature.to_string(),
            ..Self::default()
        };
        for row in rows {
            match table.cell(row, feature) {
                NumericCell::Value(v) => {
                    sample.values.push(v);
                    sample.rows.push(row);
                }
                NumericCell::Missing => sample.missing += 1,
                NumericCell::Invalid => sample.invalid += 1,
            }
        }
        if sample.invalid > 0 {
            log::debug!(
                "{feature}: {} unparseable values excluded",
                sample.invalid
            );
        }
        sample
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of source rows examined.
    pub fn source_len(&self) -> usize {
        self.values.len() + self.missing + self.invalid
    }

    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }
}

/// Per-row view of a feature: `column[row]` is `Some` when the cell is valid.
///
/// Used where two features must be aligned by row rather than by sample
/// position.
pub fn aligned_column<T>(table: &T, feature: &str) -> Vec<Option<f64>>
where
    T: LabeledTable + ?Sized,
{
    (0..table.row_count())
        .map(|row| table.cell(row, feature).value())
        .collect()
}

/// Complete-case `(x, y)` pairs over `rows`: only rows where both features
/// are valid contribute.
pub fn paired_values<T, I>(table: &T, rows: I, x: &str, y: &str) -> Vec<(f64, f64)>
where
    T: LabeledTable + ?Sized,
    I: IntoIterator<Item = usize>,
{
    rows.into_iter()
        .filter_map(|row| Some((table.cell(row, x).value()?, table.cell(row, y).value()?)))
        .collect()
}
