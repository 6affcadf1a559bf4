use thiserror::Error;

/// Errors raised by the analytics engine.
///
/// Data-quality problems (unparseable cells, short rows, sparse features) are
/// never errors; they resolve to nulls or neutral values. Only structurally
/// invalid requests end up here.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A histogram was requested over a feature with no valid values.
    #[error("no valid values for feature '{feature}'")]
    EmptySample { feature: String },

    #[error("bin count must be positive, got {0}")]
    InvalidBinCount(usize),

    /// A supplied label matrix is not square over the label set.
    #[error("expected a 3x3 label matrix, got {rows}x{cols}")]
    MatrixShape { rows: usize, cols: usize },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("unknown classification label '{0}'")]
    UnknownLabel(String),

    #[error("row is not a JSON object (got {0})")]
    MalformedRow(String),

    #[error("missing column '{0}'")]
    MissingColumn(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
