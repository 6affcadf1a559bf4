use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use super::label::Label;
use super::model::Dataset;
use super::table::parse_number;
use crate::error::{AnalyticsError, Result};

// ---------------------------------------------------------------------------
// ClassificationOutcome – one prediction row
// ---------------------------------------------------------------------------

/// A single classified object: typed labels plus an open set of numeric
/// features (`koi_period`, `ra`, `detectability`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationOutcome {
    pub predicted: Label,
    /// Ground truth, when the input carried one that normalizes to a label.
    pub truth: Option<Label>,
    /// Named numeric features; non-numeric input fields are not kept.
    pub features: BTreeMap<String, f64>,
}

impl ClassificationOutcome {
    pub fn new(predicted: Label, truth: Option<Label>) -> Self {
        ClassificationOutcome {
            predicted,
            truth,
            features: BTreeMap::new(),
        }
    }

    /// Builder-style feature insertion.
    pub fn with_feature(mut self, name: &str, value: f64) -> Self {
        self.features.insert(name.to_string(), value);
        self
    }

    pub fn feature(&self, name: &str) -> Option<f64> {
        self.features.get(name).copied()
    }

    /// `Some(true)` when predicted equals truth, `None` without a truth label.
    pub fn is_correct(&self) -> Option<bool> {
        self.truth.map(|t| t == self.predicted)
    }

    /// Parse one backend row object.
    ///
    /// ```json
    /// { "predicted_label": "CONFIRMED", "true_label": "CANDIDATE",
    ///   "koi_period": 3.52, "ra": "291.9", "kepoi_name": "K00001.01" }
    /// ```
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| AnalyticsError::MalformedRow(json_kind(value).to_string()))?;

        let predicted = obj
            .get("predicted_label")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| AnalyticsError::MissingColumn("predicted_label".into()))?
            .parse::<Label>()?;
        let truth = obj
            .get("true_label")
            .and_then(JsonValue::as_str)
            .and_then(Label::parse);

        let features = obj
            .iter()
            .filter(|(key, _)| *key != "predicted_label" && *key != "true_label")
            .filter_map(|(key, val)| json_number(val).map(|v| (key.clone(), v)))
            .collect();

        Ok(ClassificationOutcome {
            predicted,
            truth,
            features,
        })
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

fn json_number(val: &JsonValue) -> Option<f64> {
    match val {
        JsonValue::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        JsonValue::String(s) => parse_number(s),
        _ => None,
    }
}

/// Convert backend rows, skipping (and logging) those whose predicted label
/// is missing or unrecognized. Returns the outcomes and the skipped count.
pub fn outcomes_from_json_rows(rows: &[JsonValue]) -> (Vec<ClassificationOutcome>, usize) {
    let mut skipped = 0;
    let outcomes = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| match ClassificationOutcome::from_json(row) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                log::warn!("skipping row {i}: {e}");
                skipped += 1;
                None
            }
        })
        .collect();
    (outcomes, skipped)
}

/// Build outcomes from a tabular dataset carrying a predicted label column
/// and optionally a truth column. Every other column whose value parses as a
/// number becomes a feature.
pub fn outcomes_from_dataset(
    dataset: &Dataset,
    predicted_column: &str,
    truth_column: Option<&str>,
) -> Result<(Vec<ClassificationOutcome>, usize)> {
    let pred_idx = dataset
        .field_index(predicted_column)
        .ok_or_else(|| AnalyticsError::MissingColumn(predicted_column.to_string()))?;
    let truth_idx = match truth_column {
        Some(col) => Some(
            dataset
                .field_index(col)
                .ok_or_else(|| AnalyticsError::MissingColumn(col.to_string()))?,
        ),
        None => None,
    };

    let mut skipped = 0;
    let mut outcomes = Vec::with_capacity(dataset.len());
    for (row, record) in dataset.records().iter().enumerate() {
        let Some(predicted) = record.get(pred_idx).and_then(Label::parse) else {
            log::warn!(
                "row {row}: unrecognized {predicted_column} {:?}",
                record.get(pred_idx)
            );
            skipped += 1;
            continue;
        };
        let truth = truth_idx.and_then(|i| record.get(i)).and_then(Label::parse);
        let features = dataset
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != pred_idx && Some(*i) != truth_idx)
            .filter_map(|(i, name)| {
                let value = record.get(i).and_then(parse_number)?;
                Some((name.clone(), value))
            })
            .collect();
        outcomes.push(ClassificationOutcome {
            predicted,
            truth,
            features,
        });
    }
    Ok((outcomes, skipped))
}

// ---------------------------------------------------------------------------
// BatchResult – the prediction backend's batch response
// ---------------------------------------------------------------------------

/// Aggregate metrics reported by the backend alongside the rows.
///
/// Missing keys default to zero and an empty matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendMetrics {
    pub accuracy: f64,
    /// Square count matrix in the backend's own order and orientation.
    pub confusion_matrix: Vec<Vec<u64>>,
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub elapsed_s: f64,
    pub model_path: String,
    pub model_type: String,
}

/// Response body of a batch prediction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchResult {
    #[serde(default)]
    pub decoded_predictions: Vec<String>,
    /// Absent when the upload had no ground truth (`"metrics": {}`).
    #[serde(default, deserialize_with = "metrics_or_none")]
    pub metrics: Option<BackendMetrics>,
    #[serde(default)]
    pub model_info: Option<ModelInfo>,
    #[serde(default)]
    pub row_results: Vec<JsonValue>,
}

fn metrics_or_none<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<BackendMetrics>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<JsonValue>::deserialize(deserializer)? {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl BatchResult {
    pub fn outcomes(&self) -> (Vec<ClassificationOutcome>, usize) {
        outcomes_from_json_rows(&self.row_results)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::data::model::Record;

    #[test]
    fn test_from_json_keeps_numeric_fields() {
        let row = json!({
            "predicted_label": "FALSE_POSITIVE",
            "true_label": "FALSE POSITIVE",
            "koi_period": 3.5,
            "ra": "291.93",
            "kepoi_name": "K00001.01",
            "flags": [1, 2],
        });
        let outcome = ClassificationOutcome::from_json(&row).unwrap();
        assert_eq!(outcome.predicted, Label::FalsePositive);
        assert_eq!(outcome.truth, Some(Label::FalsePositive));
        assert_eq!(outcome.feature("koi_period"), Some(3.5));
        assert_eq!(outcome.feature("ra"), Some(291.93));
        assert_eq!(outcome.feature("kepoi_name"), None);
        assert_eq!(outcome.features.len(), 2);
        assert_eq!(outcome.is_correct(), Some(true));
    }

    #[test]
    fn test_from_json_requires_predicted_label() {
        let err = ClassificationOutcome::from_json(&json!({ "koi_period": 1.0 })).unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingColumn(_)));
        let err =
            ClassificationOutcome::from_json(&json!({ "predicted_label": "MAYBE" })).unwrap_err();
        assert!(matches!(err, AnalyticsError::UnknownLabel(_)));
    }

    #[test]
    fn test_from_json_rejects_non_object_row() {
        let err = ClassificationOutcome::from_json(&json!("CONFIRMED")).unwrap_err();
        assert!(matches!(err, AnalyticsError::MalformedRow(ref kind) if kind == "a string"));
        assert_eq!(err.to_string(), "row is not a JSON object (got a string)");
    }

    #[test]
    fn test_batch_without_truth_has_no_metrics() {
        let body = json!({
            "decoded_predictions": ["CONFIRMED"],
            "metrics": {},
            "model_info": { "elapsed_s": 0.2, "model_path": "m.pkl", "model_type": "multistep" },
            "row_results": [ { "predicted_label": "CONFIRMED", "koi_period": 4.1 } ]
        });
        let batch: BatchResult = serde_json::from_value(body).unwrap();
        assert!(batch.metrics.is_none());
        assert_eq!(batch.outcomes().0.len(), 1);

        let partial: BatchResult =
            serde_json::from_value(json!({ "metrics": { "accuracy": 0.75 } })).unwrap();
        let metrics = partial.metrics.unwrap();
        assert_eq!(metrics.accuracy, 0.75);
        assert!(metrics.confusion_matrix.is_empty());

        let null: BatchResult = serde_json::from_value(json!({ "metrics": null })).unwrap();
        assert!(null.metrics.is_none());
    }

    #[test]
    fn test_unknown_truth_is_none() {
        let row = json!({ "predicted_label": "CANDIDATE", "true_label": "" });
        let outcome = ClassificationOutcome::from_json(&row).unwrap();
        assert_eq!(outcome.truth, None);
        assert_eq!(outcome.is_correct(), None);
    }

    #[test]
    fn test_batch_result_skips_bad_rows() {
        let body = json!({
            "decoded_predictions": ["CONFIRMED", "CANDIDATE"],
            "metrics": {
                "accuracy": 0.5,
                "confusion_matrix": [[1, 0, 0], [0, 0, 0], [0, 1, 0]],
                "f1": 0.4, "precision": 0.5, "recall": 0.5
            },
            "model_info": { "elapsed_s": 0.12, "model_path": "m.pkl", "model_type": "multistep" },
            "row_results": [
                { "predicted_label": "CONFIRMED", "true_label": "CONFIRMED", "koi_prad": 1.1 },
                { "predicted_label": "???" }
            ]
        });
        let batch: BatchResult = serde_json::from_value(body).unwrap();
        let (outcomes, skipped) = batch.outcomes();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(skipped, 1);
        assert_eq!(batch.model_info.unwrap().model_type, "multistep");
        assert_eq!(batch.metrics.unwrap().confusion_matrix.len(), 3);
    }

    #[test]
    fn test_outcomes_from_dataset() {
        let fields = ["predicted_label", "true_label", "koi_period", "kepoi_name"]
            .map(String::from)
            .to_vec();
        let records = vec![
            Record::from_raw(["CONFIRMED", "CANDIDATE", "10.5", "K1"], 4),
            Record::from_raw(["junk", "CANDIDATE", "1.0", "K2"], 4),
            Record::from_raw(["FALSE POSITIVE"], 4),
        ];
        let ds = Dataset::new(fields, records);
        let (outcomes, skipped) =
            outcomes_from_dataset(&ds, "predicted_label", Some("true_label")).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].truth, Some(Label::Candidate));
        assert_eq!(outcomes[0].feature("koi_period"), Some(10.5));
        assert_eq!(outcomes[0].features.len(), 1);
        assert_eq!(outcomes[1].predicted, Label::FalsePositive);
        assert!(outcomes[1].features.is_empty());

        let err = outcomes_from_dataset(&ds, "label", None).unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingColumn(ref c) if c == "label"));
    }
}
