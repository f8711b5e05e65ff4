//! Error types for the aidan-eval library.

use thiserror::Error;

/// Result type alias for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors that can occur while loading results or computing reports.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Underlying I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The results archive could not be read.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The results table could not be parsed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The archive contains no entries.
    #[error("results archive is empty")]
    EmptyArchive,

    /// A required column is missing from the results table.
    #[error("missing column: {name}")]
    MissingColumn { name: String },

    /// A numeric field could not be parsed.
    #[error("invalid number in column '{field}' on line {line}: {value:?}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        line: usize,
    },

    /// An unrecognized evaluation strategy code.
    #[error("unknown strategy on line {line}: {value:?} (expected 'ro' or 'sa')")]
    UnknownStrategy { value: String, line: usize },

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),

    /// Figure rendering failed.
    #[error("rendering error: {0}")]
    Render(String),
}

impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for EvalError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        EvalError::Render(err.to_string())
    }
}
