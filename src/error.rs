//! Error taxonomy for record parsing, aggregation and hypothesis testing

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading experiment files or running statistical tests
#[derive(Error, Debug)]
pub enum StatsError {
    /// A line is missing, lacks the expected delimiter, or holds a non-numeric value
    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// An expected summary or run record file does not exist
    #[error("missing file: {}", path.display())]
    MissingFile { path: PathBuf },

    /// An instance directory holds no run records, so no mean exists
    #[error("no run records in {}: cannot average zero runs", dir.display())]
    NoRuns { dir: PathBuf },

    /// A test was given fewer values than it needs
    #[error("insufficient data for {what}: need at least {needed}, got {actual}")]
    InsufficientData {
        what: String,
        needed: usize,
        actual: usize,
    },

    /// Any other filesystem failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for library operations
pub type Result<T> = std::result::Result<T, StatsError>;

impl StatsError {
    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Map an I/O error, turning `NotFound` into [`StatsError::MissingFile`]
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingFile { path }
        } else {
            Self::Io { path, source }
        }
    }
}
