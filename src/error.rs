use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Error type covering the different failure cases that can occur while the
/// pipeline reads the worksheet, aggregates it, or writes the reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Raised when the input workbook path does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the requested worksheet is not part of the workbook.
    #[error("worksheet '{sheet}' not found (available: {available})")]
    MissingSheet { sheet: String, available: String },

    /// Raised when the promoted header does not follow the expected layout.
    #[error("schema mismatch: {0}")]
    Schema(String),

    /// Raised when an aggregate is mathematically undefined, e.g. a zero total.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the CSV writer.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised when a schema descriptor file cannot be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Coarse classification of [`ReportError`] used by callers deciding how to
/// surface a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Schema,
    DegenerateInput,
    Io,
}

impl ReportError {
    /// Maps the error onto the four failure classes of the pipeline.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::MissingInput(_) | ReportError::MissingSheet { .. } => ErrorKind::NotFound,
            ReportError::Schema(_) | ReportError::Json(_) => ErrorKind::Schema,
            ReportError::DegenerateInput(_) => ErrorKind::DegenerateInput,
            ReportError::ExcelRead(calamine::XlsxError::Io(_)) => ErrorKind::Io,
            ReportError::ExcelRead(_) => ErrorKind::Schema,
            ReportError::Io(_)
            | ReportError::ExcelWrite(_)
            | ReportError::Csv(_)
            | ReportError::Logging(_) => ErrorKind::Io,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "NotFoundError"),
            ErrorKind::Schema => write!(f, "SchemaError"),
            ErrorKind::DegenerateInput => write!(f, "DegenerateInputError"),
            ErrorKind::Io => write!(f, "IoError"),
        }
    }
}
