use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use exoscope::config::AnalyticsConfig;
use exoscope::data::label::Label;
use exoscope::data::loader::{load_file, LoadedInput};
use exoscope::report::DashboardReport;
use exoscope::state::{ClassFilter, SortDirection, SortKey, ViewState};

/// Compute dashboard analytics for a Kepler table or a prediction batch.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Input file: `.csv` table or `.json` batch response
    input: PathBuf,

    /// JSON file with analytics settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Histogram bin count
    #[arg(long)]
    bins: Option<usize>,

    /// Minimum valid values for a feature to enter the correlation matrix
    #[arg(long)]
    min_valid: Option<usize>,

    /// Sort the predictions table by this column (`predicted`, `truth` or a feature)
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    descending: bool,

    /// Only show rows predicted as this class
    #[arg(long, value_parser = parse_label)]
    class: Option<Label>,

    /// Only show rows whose prediction disagrees with the truth label
    #[arg(long)]
    mismatches: bool,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

fn parse_label(s: &str) -> Result<Label, String> {
    s.parse::<Label>().map_err(|e| e.to_string())
}

fn view_state(args: &Args) -> ViewState {
    let mut view = ViewState::default();
    if let Some(sort) = &args.sort {
        let key = match sort.as_str() {
            "predicted" => SortKey::Predicted,
            "truth" | "true" => SortKey::Truth,
            feature => SortKey::feature(feature),
        };
        // An explicit key always starts ascending; `sort_by` toggles.
        view.sort_key = key;
        view.direction = SortDirection::Ascending;
    }
    if args.descending {
        view.direction = view.direction.flipped();
    }
    if let Some(label) = args.class {
        view.set_class_filter(ClassFilter::Only(label));
    }
    view.set_mismatch_only(args.mismatches);
    view
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AnalyticsConfig::from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => AnalyticsConfig::default(),
    };
    if let Some(bins) = args.bins {
        config.num_bins = bins;
    }
    if let Some(min_valid) = args.min_valid {
        config.min_valid_count = min_valid;
    }
    let mut view = view_state(&args);
    view.missing = config.missing_sort;

    let input = load_file(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    let report = match &input {
        LoadedInput::Table(dataset) => DashboardReport::for_dataset(dataset, &config, &view),
        LoadedInput::Batch(batch) => DashboardReport::for_batch(batch, &config, &view),
    }
    .context("computing report")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.compact {
        serde_json::to_writer(&mut out, &report)?;
    } else {
        serde_json::to_writer_pretty(&mut out, &report)?;
    }
    writeln!(out)?;
    Ok(())
}
