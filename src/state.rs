use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::data::label::Label;
use crate::data::outcome::ClassificationOutcome;

// ---------------------------------------------------------------------------
// Predictions table view state
// ---------------------------------------------------------------------------

/// Column the predictions table is ordered by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Predicted,
    Truth,
    /// Any numeric feature, e.g. `koi_period` or `ra`.
    Feature(String),
}

impl SortKey {
    pub fn feature(name: &str) -> Self {
        SortKey::Feature(name.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Which predicted class the table shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassFilter {
    #[default]
    All,
    Only(Label),
}

impl ClassFilter {
    fn accepts(self, label: Label) -> bool {
        match self {
            ClassFilter::All => true,
            ClassFilter::Only(l) => l == label,
        }
    }
}

/// Placement of rows that have no value for the sort key.
///
/// Independent of the sort direction: `Last` keeps them at the bottom both
/// ascending and descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingSort {
    First,
    #[default]
    Last,
    Exclude,
}

/// A value a row can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue {
    Text(&'static str),
    Number(f64),
}

impl SortValue {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            // A key always yields one kind; order text after numbers for totality.
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        }
    }
}

/// Value of `key` for one row, or `None` when the row lacks it.
pub fn sort_value(outcome: &ClassificationOutcome, key: &SortKey) -> Option<SortValue> {
    match key {
        SortKey::Predicted => Some(SortValue::Text(outcome.predicted.as_display())),
        SortKey::Truth => outcome.truth.map(|t| SortValue::Text(t.as_display())),
        SortKey::Feature(name) => outcome.feature(name).map(SortValue::Number),
    }
}

/// Sort/filter configuration of the predictions table.
///
/// Holds no rows; [`ViewState::apply`] derives a fresh projection each time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub sort_key: SortKey,
    pub direction: SortDirection,
    pub class_filter: ClassFilter,
    /// Show only rows whose prediction disagrees with a known truth label.
    pub mismatch_only: bool,
    pub missing: MissingSort,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            sort_key: SortKey::feature("koi_period"),
            direction: SortDirection::Ascending,
            class_filter: ClassFilter::All,
            mismatch_only: false,
            missing: MissingSort::Last,
        }
    }
}

/// Counts shown above the table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewSummary {
    pub shown: usize,
    pub total: usize,
    /// Rows (of all, not just shown) whose prediction matches the truth.
    pub correct: usize,
    /// `correct` over rows with a truth label; 0 when none have one.
    pub accuracy: f64,
}

impl ViewState {
    /// Select a column header: the same key flips direction, a new key sorts
    /// ascending.
    pub fn sort_by(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.direction = self.direction.flipped();
        } else {
            self.sort_key = key;
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn set_class_filter(&mut self, filter: ClassFilter) {
        self.class_filter = filter;
    }

    pub fn set_mismatch_only(&mut self, mismatch_only: bool) {
        self.mismatch_only = mismatch_only;
    }

    fn keeps(&self, outcome: &ClassificationOutcome) -> bool {
        if !self.class_filter.accepts(outcome.predicted) {
            return false;
        }
        // Rows without a truth label cannot be judged a mismatch.
        !self.mismatch_only || outcome.is_correct() == Some(false)
    }

    /// Filtered and sorted rows. The input is left untouched and equal keys
    /// keep their input order.
    pub fn apply<'a>(&self, outcomes: &'a [ClassificationOutcome]) -> Vec<&'a ClassificationOutcome> {
        let mut present = Vec::new();
        let mut missing = Vec::new();
        for outcome in outcomes.iter().filter(|o| self.keeps(o)) {
            match sort_value(outcome, &self.sort_key) {
                Some(value) => present.push((value, outcome)),
                None => missing.push(outcome),
            }
        }

        present.sort_by(|(a, _), (b, _)| {
            let ord = a.compare(b);
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        let sorted = present.into_iter().map(|(_, o)| o);

        match self.missing {
            MissingSort::First => missing.into_iter().chain(sorted).collect(),
            MissingSort::Last => sorted.chain(missing).collect(),
            MissingSort::Exclude => sorted.collect(),
        }
    }

    pub fn summary(&self, outcomes: &[ClassificationOutcome]) -> ViewSummary {
        let judged = outcomes.iter().filter(|o| o.truth.is_some()).count();
        let correct = outcomes
            .iter()
            .filter(|o| o.is_correct() == Some(true))
            .count();
        ViewSummary {
            shown: self.apply(outcomes).len(),
            total: outcomes.len(),
            correct,
            accuracy: if judged == 0 {
                0.0
            } else {
                correct as f64 / judged as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ClassificationOutcome> {
        vec![
            ClassificationOutcome::new(Label::Confirmed, Some(Label::Confirmed))
                .with_feature("koi_period", 30.0),
            ClassificationOutcome::new(Label::Candidate, Some(Label::Confirmed))
                .with_feature("koi_period", 2.0),
            ClassificationOutcome::new(Label::FalsePositive, None),
            ClassificationOutcome::new(Label::Confirmed, Some(Label::FalsePositive))
                .with_feature("koi_period", 2.0),
        ]
    }

    fn periods(view: &[&ClassificationOutcome]) -> Vec<Option<f64>> {
        view.iter().map(|o| o.feature("koi_period")).collect()
    }

    #[test]
    fn test_default_sorts_by_period_ascending() {
        let data = rows();
        let view = ViewState::default().apply(&data);
        assert_eq!(periods(&view), vec![Some(2.0), Some(2.0), Some(30.0), None]);
        // Stable: equal periods keep input order.
        assert_eq!(view[0].predicted, Label::Candidate);
        assert_eq!(view[1].predicted, Label::Confirmed);
    }

    #[test]
    fn test_toggle_direction_and_reset() {
        let mut state = ViewState::default();
        state.sort_by(SortKey::feature("koi_period"));
        assert_eq!(state.direction, SortDirection::Descending);
        let data = rows();
        let view = state.apply(&data);
        assert_eq!(periods(&view), vec![Some(30.0), Some(2.0), Some(2.0), None]);

        state.sort_by(SortKey::Predicted);
        assert_eq!(state.sort_key, SortKey::Predicted);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_missing_placement() {
        let data = rows();
        let mut state = ViewState {
            missing: MissingSort::First,
            ..ViewState::default()
        };
        assert_eq!(state.apply(&data)[0].feature("koi_period"), None);
        state.missing = MissingSort::Exclude;
        assert_eq!(state.apply(&data).len(), 3);
    }

    #[test]
    fn test_sort_by_label_text() {
        let data = rows();
        let mut state = ViewState::default();
        state.sort_by(SortKey::Predicted);
        let labels: Vec<Label> = state.apply(&data).iter().map(|o| o.predicted).collect();
        assert_eq!(
            labels,
            vec![Label::Candidate, Label::Confirmed, Label::Confirmed, Label::FalsePositive]
        );
    }

    #[test]
    fn test_class_filter_and_mismatch() {
        let data = rows();
        let mut state = ViewState::default();
        state.set_class_filter(ClassFilter::Only(Label::Confirmed));
        assert_eq!(state.apply(&data).len(), 2);

        state.set_class_filter(ClassFilter::All);
        state.set_mismatch_only(true);
        let view = state.apply(&data);
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|o| o.is_correct() == Some(false)));
    }

    #[test]
    fn test_apply_does_not_mutate() {
        let data = rows();
        let before = data.clone();
        let mut state = ViewState::default();
        state.sort_by(SortKey::Truth);
        let _ = state.apply(&data);
        assert_eq!(data, before);
    }

    #[test]
    fn test_summary() {
        let data = rows();
        let mut state = ViewState::default();
        state.set_mismatch_only(true);
        let summary = state.summary(&data);
        assert_eq!(summary.shown, 2);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.correct, 1);
        assert!((summary.accuracy - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_view_state_from_json() {
        let state: ViewState = serde_json::from_str(
            r#"{ "sort_key": { "feature": "ra" }, "direction": "descending",
                 "class_filter": { "only": "FALSE_POSITIVE" } }"#,
        )
        .unwrap();
        assert_eq!(state.sort_key, SortKey::feature("ra"));
        assert_eq!(state.class_filter, ClassFilter::Only(Label::FalsePositive));
        assert!(!state.mismatch_only);
    }
}
