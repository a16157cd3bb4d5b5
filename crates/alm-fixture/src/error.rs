//! Fixture error types.

use std::path::PathBuf;

use alm_oracle::OracleError;
use alm_schema::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    /// A fixture file could not be opened or created.
    #[error("Cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing a fixture stream failed.
    #[error("Fixture I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A fixture line is not valid JSON.
    #[error("{}:{line}: malformed fixture line: {message}", path.display())]
    Malformed {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// The calendrical engine became unreachable mid-run.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// The record schema could not be loaded.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
