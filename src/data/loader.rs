use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde_json::Value as JsonValue;

use super::model::{Dataset, Record};
use super::outcome::BatchResult;
use crate::error::{AnalyticsError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// What a file on disk turned out to contain.
#[derive(Debug, Clone)]
pub enum LoadedInput {
    /// A delimited table (Kepler cumulative export or a prediction export).
    Table(Dataset),
    /// A batch prediction response from the backend.
    Batch(BatchResult),
}

/// Load an input file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header line plus data lines, quote-aware
/// * `.json` – a batch response object, or a bare array of row objects
pub fn load_file(path: &Path) -> Result<LoadedInput> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => load_csv(path).map(LoadedInput::Table),
        "json" => load_json(path).map(LoadedInput::Batch),
        other => Err(AnalyticsError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Load a comma-separated file from disk.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)?;
    let dataset = parse_csv(&text)?;
    log::info!("loaded {} from {}", dataset, path.display());
    Ok(dataset)
}

/// Parse comma-separated text held in memory.
///
/// ```text
/// kepoi_name,koi_disposition,koi_period
/// K00752.01,CONFIRMED,9.488
/// K00752.02,CANDIDATE
/// ```
///
/// The first line is the schema. Short rows are null-padded, long rows are
/// truncated to the schema width, cells are trimmed and empty cells become
/// null. Quoted cells may contain commas and newlines. An empty line between
/// data lines is an all-null record; trailing empty lines are dropped.
pub fn parse_csv(text: &str) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let fields: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let width = fields.len();

    let mut records = Vec::new();
    let mut short_rows = 0usize;
    let mut blank_rows = 0usize;
    let mut consumed = byte_offset(&reader);
    let mut raw = StringRecord::new();
    while reader.read_record(&mut raw)? {
        let end = byte_offset(&reader);
        // The reader skips empty lines; recover them from the bytes it ate.
        let blanks = leading_blank_lines(text, consumed, end);
        records.extend((0..blanks).map(|_| Record::from_raw(std::iter::empty::<&str>(), width)));
        blank_rows += blanks;
        consumed = end;

        if raw.len() < width {
            short_rows += 1;
        }
        records.push(Record::from_raw(raw.iter(), width));
    }
    if short_rows > 0 {
        log::debug!("{short_rows} rows shorter than the {width}-field header were null-padded");
    }
    if blank_rows > 0 {
        log::debug!("{blank_rows} empty lines kept as null records");
    }

    Ok(Dataset::new(fields, records))
}

fn byte_offset<R: std::io::Read>(reader: &csv::Reader<R>) -> usize {
    usize::try_from(reader.position().byte()).unwrap_or(usize::MAX)
}

/// Empty lines at the start of `text[start..end]`, the span the reader
/// consumed for one record.
fn leading_blank_lines(text: &str, start: usize, end: usize) -> usize {
    let Some(mut span) = text.get(start..end) else {
        return 0;
    };
    // The previous record may have stopped between `\r` and `\n`.
    if start > 0 && text.as_bytes().get(start - 1) == Some(&b'\r') {
        span = span.strip_prefix('\n').unwrap_or(span);
    }
    span.split('\n')
        .take_while(|line| line.is_empty() || *line == "\r")
        .count()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Load a batch response, or a bare JSON array of row objects.
pub fn load_json(path: &Path) -> Result<BatchResult> {
    let text = std::fs::read_to_string(path)?;
    let batch = parse_batch_json(&text)?;
    log::info!(
        "loaded {} row results from {}",
        batch.row_results.len(),
        path.display()
    );
    Ok(batch)
}

pub fn parse_batch_json(text: &str) -> Result<BatchResult> {
    let root: JsonValue = serde_json::from_str(text)?;
    match root {
        JsonValue::Array(rows) => Ok(BatchResult {
            row_results: rows,
            ..BatchResult::default()
        }),
        other => Ok(serde_json::from_value(other)?),
    }
}
