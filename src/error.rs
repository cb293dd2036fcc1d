//! Error types for filequery.

use std::path::PathBuf;

use datafusion::error::DataFusionError;
use thiserror::Error;

/// Every failure a filequery run can end with.
#[derive(Error, Debug)]
pub enum FileQueryError {
    /// Missing or conflicting command-line flags
    #[error("{0}")]
    Argument(String),

    /// Config file could not be read or is not valid JSON
    #[error("failed to parse config file {}: {reason}", path.display())]
    ConfigParse { path: PathBuf, reason: String },

    /// Query file could not be read
    #[error("error reading query file {}: {source}", path.display())]
    QueryFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Files could not be registered as tables
    #[error("failed to open file database: {0}")]
    Database(String),

    /// Invalid SQL, unknown table or unknown column
    #[error("failed to query file: {0}")]
    QueryExecution(#[from] DataFusionError),

    /// Query text contained no statements
    #[error("no SQL statements to execute")]
    EmptyQuery,

    /// Result could not be rendered for printing
    #[error("failed to render results: {0}")]
    Render(String),

    /// Writing rendered results to standard output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Result could not be written to the output file
    #[error("failed to export results to {}: {reason}", path.display())]
    Export { path: PathBuf, reason: String },
}

impl FileQueryError {
    pub fn export(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        FileQueryError::Export {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    /// True when the usage text should be shown alongside the message.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, FileQueryError::Argument(_))
    }
}

pub type Result<T> = std::result::Result<T, FileQueryError>;
