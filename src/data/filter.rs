use std::collections::BTreeMap;

use super::label::Label;
use super::table::{LabelColumn, LabeledTable};

// ---------------------------------------------------------------------------
// Label predicates: which rows belong to which class
// ---------------------------------------------------------------------------

/// Indices of rows whose `column` label equals `label`.
pub fn filtered_indices<T>(table: &T, column: LabelColumn, label: Label) -> Vec<usize>
where
    T: LabeledTable + ?Sized,
{
    (0..table.row_count())
        .filter(|&row| table.label(row, column) == Some(label))
        .collect()
}

/// Number of rows carrying `label` in `column`.
pub fn count_label<T>(table: &T, column: LabelColumn, label: Label) -> usize
where
    T: LabeledTable + ?Sized,
{
    (0..table.row_count())
        .filter(|&row| table.label(row, column) == Some(label))
        .count()
}

/// Split row indices by label.
///
/// Every label in [`Label::ALL`] is present in the result, possibly with an
/// empty index list. Rows without a recognized label are left out.
pub fn partition_by_label<T>(table: &T, column: LabelColumn) -> BTreeMap<Label, Vec<usize>>
where
    T: LabeledTable + ?Sized,
{
    let mut groups: BTreeMap<Label, Vec<usize>> =
        Label::ALL.iter().map(|&l| (l, Vec::new())).collect();
    for row in 0..table.row_count() {
        if let Some(label) = table.label(row, column) {
            groups.entry(label).or_default().push(row);
        }
    }
    groups
}
