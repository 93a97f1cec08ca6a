use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Error type covering the failure cases of loading a snapshot, building the
/// report tables, and rendering them.
///
/// Incomplete tagging or dangling cross references are not errors: the
/// flattening layer falls back to raw identifiers and placeholders instead.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the snapshot JSON cannot be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a snapshot record lacks its mandatory identifier.
    #[error("{kind} at position {index} has no identifier")]
    MissingIdentifier { kind: &'static str, index: usize },

    /// Raised when a flattened row does not match the width of its layout.
    #[error("row has {found} cells but the layout declares {expected} columns")]
    RowWidth { expected: usize, found: usize },

    /// Raised when a sort key, merge column or header group points past the
    /// last column of the layout.
    #[error("column {column} is out of range for a layout with {width} columns")]
    ColumnOutOfRange { column: usize, width: usize },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when a workbook does not contain the requested sheet.
    #[error("missing sheet '{0}'")]
    MissingSheet(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
