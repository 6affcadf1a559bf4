use approx::assert_relative_eq;

use exoscope::analytics::classes::ClassBreakdown;
use exoscope::analytics::correlation::CorrelationMatrix;
use exoscope::analytics::histogram::Histogram;
use exoscope::analytics::matrix::{LabelCountMatrix, MatrixView};
use exoscope::analytics::numeric::NumericSample;
use exoscope::config::AnalyticsConfig;
use exoscope::data::label::Label;
use exoscope::data::loader::parse_csv;
use exoscope::data::outcome::ClassificationOutcome;
use exoscope::data::table::{LabelColumn, LabeledDataset};
use exoscope::report::DashboardReport;
use exoscope::state::ViewState;

#[test]
fn ingest_small_table() {
    let ds = parse_csv("a,b\n1,2\n3,4").unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.fields(), ["a", "b"]);
    assert_eq!(ds.value(0, "a"), Some("1"));
    assert_eq!(ds.value(0, "b"), Some("2"));
}

#[test]
fn quoted_cells_keep_their_commas() {
    let ds = parse_csv("kepoi_name,comment\nK1,\"deep, v-shaped\"").unwrap();
    assert_eq!(ds.value(0, "comment"), Some("deep, v-shaped"));
}

#[test]
fn histogram_of_one_to_ten() {
    let ds = parse_csv("x\n1\n2\n3\n4\n5\n6\n7\n8\n9\n10").unwrap();
    let sample = NumericSample::extract(&ds, "x");
    let histogram = Histogram::of(&sample, 5).unwrap();
    assert_eq!(histogram.bins.len(), 5);
    for bin in &histogram.bins {
        assert_relative_eq!(bin.end - bin.start, 1.8, epsilon = 1e-9);
    }
    let last = &histogram.bins[4];
    assert_relative_eq!(last.start, 8.2, epsilon = 1e-9);
    assert_eq!(last.end, 10.0);
    assert_eq!(last.count, 2);
}

#[test]
fn histogram_counts_sum_to_sample_size() {
    let ds = parse_csv("v\n0.3\n-2\n17\n4.4\n4.4\nbad\n\n9\n1e3").unwrap();
    let sample = NumericSample::extract(&ds, "v");
    for bins in [1, 2, 3, 7, 10, 50] {
        let histogram = Histogram::of(&sample, bins).unwrap();
        assert_eq!(histogram.total(), sample.len() as u64, "{bins} bins");
    }
}

#[test]
fn true_vs_predicted_counts() {
    let outcomes = vec![
        ClassificationOutcome::new(Label::Confirmed, Some(Label::Confirmed)),
        ClassificationOutcome::new(Label::Candidate, Some(Label::Confirmed)),
        ClassificationOutcome::new(Label::Confirmed, Some(Label::Confirmed)),
    ];
    let matrix = LabelCountMatrix::from_outcomes(&outcomes);
    assert_eq!(matrix.get(Label::Confirmed, Label::Confirmed), 2);
    assert_eq!(matrix.get(Label::Candidate, Label::Confirmed), 1);
    assert_eq!(matrix.total(), 3);
    assert_relative_eq!(matrix.accuracy(), 2.0 / 3.0);

    let view = MatrixView::from(&matrix);
    assert_eq!(view.row_axis, "predicted");
    assert_eq!(view.counts.iter().flatten().sum::<u64>(), 3);
}

#[test]
fn correlation_needs_enough_rows() {
    let ds = parse_csv("x,y\n1,2\n2,4\n3,6\n4,8").unwrap();
    let features = vec!["x".to_string(), "y".to_string()];
    let matrix = CorrelationMatrix::with_thresholds(&ds, &features, 1, 11);
    assert_eq!(matrix.get("x", "y"), Some(0.0));
}

fn noisy_table() -> String {
    let mut csv = String::from("koi_disposition,a,b,c\n");
    for i in 0..40 {
        let x = f64::from(i);
        let label = ["CONFIRMED", "CANDIDATE", "FALSE POSITIVE"][i as usize % 3];
        let b = if i % 7 == 0 { String::new() } else { format!("{}", (x * 0.7).sin() * 5.0 + x) };
        csv.push_str(&format!("{label},{x},{b},{}\n", 40.0 - x * x / 10.0));
    }
    csv
}

#[test]
fn correlation_matrix_is_symmetric_and_bounded() {
    let ds = parse_csv(&noisy_table()).unwrap();
    let features = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let matrix = CorrelationMatrix::with_thresholds(&ds, &features, 10, 11);
    assert_eq!(matrix.size(), 3);
    for i in 0..3 {
        for j in 0..3 {
            let r = matrix.values[i][j];
            assert_eq!(r, matrix.values[j][i]);
            assert!((-1.0..=1.0).contains(&r));
        }
        assert_relative_eq!(matrix.values[i][i], 1.0, epsilon = 1e-9);
    }
}

#[test]
fn class_partition_covers_labeled_rows() {
    let ds = parse_csv(&noisy_table()).unwrap();
    let table = LabeledDataset::new(&ds, None, Some("koi_disposition")).unwrap();
    let breakdown = ClassBreakdown::new(&table, LabelColumn::Truth);
    assert_eq!(breakdown.labeled_rows(), 40);
    let shares: f64 = breakdown.shares().iter().map(|s| s.share).sum();
    assert_relative_eq!(shares, 1.0, epsilon = 1e-12);

    // Each class's sample plus the whole-table sample agree on counts.
    let per_class: usize = Label::ALL
        .iter()
        .map(|&label| breakdown.sample(label, "b").len())
        .sum();
    assert_eq!(per_class, NumericSample::extract(&ds, "b").len());
}

#[test]
fn report_is_idempotent_and_leaves_input_alone() {
    let ds = parse_csv(&noisy_table()).unwrap();
    let before = ds.clone();
    let config = AnalyticsConfig {
        min_valid_count: 10,
        features: vec!["a".into(), "b".into(), "c".into()],
        ..AnalyticsConfig::default()
    };
    let first = DashboardReport::for_dataset(&ds, &config, &ViewState::default()).unwrap();
    let second = DashboardReport::for_dataset(&ds, &config, &ViewState::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(ds, before);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
