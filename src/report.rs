use serde::Serialize;

use crate::analytics::classes::{ClassBreakdown, ClassHistogram, ClassScatter, ClassSummary, Overview};
use crate::analytics::correlation::CorrelationMatrix;
use crate::analytics::descriptive::Summary;
use crate::analytics::histogram::Histogram;
use crate::analytics::matrix::{LabelCountMatrix, MatrixView, MetricsReport};
use crate::analytics::numeric::NumericSample;
use crate::config::AnalyticsConfig;
use crate::data::model::Dataset;
use crate::data::outcome::{outcomes_from_dataset, BatchResult, ClassificationOutcome, ModelInfo};
use crate::data::table::{LabelColumn, LabeledDataset, LabeledTable};
use crate::error::{AnalyticsError, Result};
use crate::state::{ViewState, ViewSummary};

/// Axes of the default scatter plot (orbital period vs planet radius).
const SCATTER_AXES: (&str, &str) = ("koi_period", "koi_prad");

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Everything computed for one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureReport {
    pub feature: String,
    pub summary: Summary,
    /// Null cells skipped.
    pub missing: usize,
    /// Non-numeric cells skipped.
    pub invalid: usize,
    pub histogram: Histogram,
    pub classes: Vec<ClassSummary>,
    pub class_histograms: Vec<ClassHistogram>,
}

/// The predictions table as currently sorted and filtered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableReport {
    pub view: ViewState,
    pub summary: ViewSummary,
    pub rows: Vec<ClassificationOutcome>,
}

/// All series and scalars a dashboard renders for one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub group_by: LabelColumn,
    pub overview: Overview,
    pub features: Vec<FeatureReport>,
    pub correlation: CorrelationMatrix,
    pub scatter: Vec<ClassScatter>,
    /// Outcome rows dropped for an unrecognized predicted label.
    pub skipped_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub true_vs_predicted: Option<MatrixView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_confusion: Option<MatrixView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableReport>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

impl DashboardReport {
    /// Report for a CSV table.
    ///
    /// A table carrying the configured predicted column is treated as a
    /// prediction export; otherwise it is explored by its disposition column.
    pub fn for_dataset(dataset: &Dataset, config: &AnalyticsConfig, view: &ViewState) -> Result<Self> {
        if dataset.field_index(&config.predicted_column).is_some() {
            let truth = [&config.truth_column, &config.disposition_column]
                .into_iter()
                .find(|c| dataset.field_index(c).is_some());
            let (outcomes, skipped) =
                outcomes_from_dataset(dataset, &config.predicted_column, truth.map(String::as_str))?;
            let mut report = Self::for_outcomes(&outcomes, config, view)?;
            report.skipped_rows = skipped;
            return Ok(report);
        }

        let disposition = dataset
            .field_index(&config.disposition_column)
            .map(|_| config.disposition_column.as_str());
        if disposition.is_none() {
            log::warn!(
                "no '{}' column; class breakdowns will be empty",
                config.disposition_column
            );
        }
        let table = LabeledDataset::new(dataset, None, disposition)?;
        Self::build(&table, LabelColumn::Truth, config)
    }

    /// Report for classified rows, grouped by predicted label.
    pub fn for_outcomes(
        outcomes: &[ClassificationOutcome],
        config: &AnalyticsConfig,
        view: &ViewState,
    ) -> Result<Self> {
        let mut report = Self::build(outcomes, LabelColumn::Predicted, config)?;

        let matrix = LabelCountMatrix::from_outcomes(outcomes);
        if matrix.total() > 0 {
            report.metrics = Some(matrix.class_metrics());
            report.true_vs_predicted = Some(MatrixView::from(&matrix));
        }
        report.table = Some(TableReport {
            view: view.clone(),
            summary: view.summary(outcomes),
            rows: view.apply(outcomes).into_iter().cloned().collect(),
        });
        Ok(report)
    }

    /// Report for a backend batch response.
    pub fn for_batch(batch: &BatchResult, config: &AnalyticsConfig, view: &ViewState) -> Result<Self> {
        let (outcomes, skipped) = batch.outcomes();
        let mut report = Self::for_outcomes(&outcomes, config, view)?;
        report.skipped_rows = skipped;
        report.model_info = batch.model_info.clone();
        let backend = batch
            .metrics
            .as_ref()
            .map(|m| m.confusion_matrix.as_slice())
            .filter(|m| !m.is_empty());
        if let Some(confusion) = backend {
            // The backend drops classes absent from the batch, so a 2x2
            // matrix is a valid response that cannot be mapped onto labels.
            match LabelCountMatrix::from_backend(confusion) {
                Ok(matrix) => report.backend_confusion = Some(MatrixView::from(&matrix)),
                Err(e @ AnalyticsError::MatrixShape { .. }) => {
                    log::warn!("ignoring backend confusion matrix: {e}");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(report)
    }

    fn build<T>(table: &T, group_by: LabelColumn, config: &AnalyticsConfig) -> Result<Self>
    where
        T: LabeledTable + ?Sized,
    {
        let breakdown = ClassBreakdown::new(table, group_by);
        let features = config
            .features
            .iter()
            .map(|feature| {
                let sample = NumericSample::extract(table, feature);
                Ok(FeatureReport {
                    feature: feature.clone(),
                    summary: Summary::of(&sample),
                    missing: sample.missing,
                    invalid: sample.invalid,
                    histogram: Histogram::of_or_empty(&sample, config.num_bins)?,
                    classes: breakdown.summaries(feature),
                    class_histograms: breakdown.histograms(feature, config.num_bins)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "report over {} rows, {} features, grouped by {group_by:?}",
            table.row_count(),
            features.len()
        );

        Ok(DashboardReport {
            group_by,
            overview: Overview::new(table, group_by, &config.features),
            features,
            correlation: CorrelationMatrix::new(table, &config.features, config),
            scatter: breakdown.scatter(SCATTER_AXES.0, SCATTER_AXES.1),
            skipped_rows: 0,
            true_vs_predicted: None,
            metrics: None,
            backend_confusion: None,
            model_info: None,
            table: None,
        })
    }
}
