//! Error types for namecast

use std::fmt;
use std::io;
use thiserror::Error;

/// Classification of everything the sink can record.
///
/// Only `ParseFatal` and `CastFailed` stop the run; the rest are recorded
/// and the caller continues with a fallback value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ParseFatal,
    CastFailed,
    ParseWarning,
    CastUnknownType,
    SelectionError,
    ExtensionMismatch,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ParseFatal => "parse_fatal",
            ErrorKind::CastFailed => "cast_failed",
            ErrorKind::ParseWarning => "parse_warning",
            ErrorKind::CastUnknownType => "cast_unknown_type",
            ErrorKind::SelectionError => "selection_error",
            ErrorKind::ExtensionMismatch => "extension_mismatch",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorKind::ParseFatal | ErrorKind::CastFailed)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Namecast error type
#[derive(Error, Debug)]
pub enum NamecastError {
    /// A fatal condition that has already been recorded and flushed.
    #[error("{kind}: {message}")]
    Fatal { kind: ErrorKind, message: String },

    /// A custom cast transform failed. Passed through untouched.
    #[error("Transform error on field '{field}': {source}")]
    Transform {
        field: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(String),
}

impl NamecastError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, NamecastError::Fatal { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, NamecastError>;
