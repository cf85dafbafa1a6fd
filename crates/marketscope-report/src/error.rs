//! Error types for chart rendering and report production.

use std::path::PathBuf;

use thiserror::Error;

/// Why a single chart could not be drawn.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("No data to plot")]
    NoData,

    #[error("Drawing failed: {0}")]
    Drawing(String),
}

/// Failure to assemble, write or retrieve a report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Report not found: {0}")]
    NotFound(String),

    #[error("Invalid report name: {0}")]
    InvalidName(String),
}

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
