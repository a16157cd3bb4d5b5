//! Cross-cutting error types.
//!
//! Domain-specific errors (`OracleError`, `FixtureError`, ...) are defined in
//! their respective crates. A unified error is deferred to `alm-cli` where all
//! crate errors converge into `anyhow`.

use thiserror::Error;

/// Errors that can be raised while building core values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A year range with `start > end` or a year outside `1..=9999`.
    #[error("Invalid year range {start}..={end}: {reason}")]
    InvalidRange {
        start: i32,
        end: i32,
        reason: String,
    },

    /// A time-of-day that is not `HH:MM` within a day.
    #[error("Invalid sample time '{0}' (expected HH:MM)")]
    InvalidTime(String),

    /// Unknown configuration mode name.
    #[error("Invalid configuration mode '{0}' (expected 'duty' or 'noduty')")]
    InvalidMode(String),

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
