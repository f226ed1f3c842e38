//! Error types for the anyfile library.
//!
//! Every failure carries an [`ErrorKind`] (what went wrong at a high level),
//! the name of the operation that was attempted, and the underlying cause
//! when there is one.

use std::fmt;

use thiserror::Error;

/// Boxed error used as the chained cause of a [`FileError`].
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// High-level failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The operation does not apply to this file's source.
    InvalidSource,
    /// The filesystem path or object-storage key does not exist.
    NotFound,
    /// An HTTP or object-storage call failed or returned a non-success status.
    Transport,
    /// Reading content failed.
    Read,
    /// Writing content failed.
    Write,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidSource => "invalid source",
            ErrorKind::NotFound => "not found",
            ErrorKind::Transport => "transport failure",
            ErrorKind::Read => "read failure",
            ErrorKind::Write => "write failure",
        };
        f.write_str(s)
    }
}

/// Error returned by every fallible operation in this crate.
#[derive(Error, Debug)]
#[error("{kind}: {operation}: {detail}")]
pub struct FileError {
    kind: ErrorKind,
    operation: &'static str,
    detail: String,
    #[source]
    source: Option<BoxedError>,
}

impl FileError {
    /// Creates an error of `kind` for `operation`, chaining `cause`.
    pub fn new(kind: ErrorKind, operation: &'static str, cause: impl Into<BoxedError>) -> Self {
        let cause = cause.into();
        Self {
            kind,
            operation,
            detail: cause.to_string(),
            source: Some(cause),
        }
    }

    /// Creates an [`ErrorKind::InvalidSource`] error. There is no underlying
    /// cause: the check happens before any I/O.
    pub fn invalid_source(operation: &'static str, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidSource,
            operation,
            detail: detail.into(),
            source: None,
        }
    }

    /// Wraps an I/O error, mapping `NotFound` to [`ErrorKind::NotFound`] and
    /// everything else to `fallback`.
    pub fn io(fallback: ErrorKind, operation: &'static str, err: std::io::Error) -> Self {
        let kind = if err.kind() == std::io::ErrorKind::NotFound {
            ErrorKind::NotFound
        } else {
            fallback
        };
        Self::new(kind, operation, err)
    }

    /// The failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The operation that was attempted (e.g. `"from_file"`, `"append"`).
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Whether the operation does not apply to this file's source.
    pub fn is_invalid_source(&self) -> bool {
        self.kind == ErrorKind::InvalidSource
    }

    /// Whether the path or object key does not exist.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// Whether an HTTP or object-storage call failed.
    pub fn is_transport(&self) -> bool {
        self.kind == ErrorKind::Transport
    }

    /// Whether reading content failed.
    pub fn is_read(&self) -> bool {
        self.kind == ErrorKind::Read
    }

    /// Whether writing content failed.
    pub fn is_write(&self) -> bool {
        self.kind == ErrorKind::Write
    }
}

/// Convenience type alias for Results using FileError.
pub type Result<T> = std::result::Result<T, FileError>;
