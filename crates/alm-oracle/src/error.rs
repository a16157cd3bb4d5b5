//! Oracle error types.

use alm_core::sample::SampleKey;
use thiserror::Error;

/// Failures talking to a calendrical engine.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The engine process could not be started.
    #[error("Failed to start oracle '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the engine failed.
    #[error("Oracle I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine replied with something that is not a valid protocol message.
    #[error("Oracle protocol error: {0}")]
    Protocol(String),

    /// The engine closed its output before replying.
    #[error("Oracle exited unexpectedly{}", stderr_suffix(.stderr))]
    Exited { stderr: String },

    /// The engine raised while computing one sample.
    #[error("{kind}: {message}")]
    Computation { kind: String, message: String },

    /// A well-formed reply whose snapshot does not fit `OracleSnapshot`,
    /// e.g. a `null` where a string is expected.
    #[error("Oracle snapshot rejected: {message}")]
    Snapshot { message: String },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Outcome classification for one sample that produced no observation.
///
/// Only `Bridge` is fatal to a generation run. The other two skip the sample.
/// An engine exception and a snapshot that fails to decode both become
/// `OracleComputation`.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The `(year, month, day)` triple is not a real Gregorian date.
    #[error("Not a calendar date: {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// The engine raised while computing this sample.
    #[error("Oracle failed for {key}: {message}")]
    OracleComputation { key: SampleKey, message: String },

    /// The transport to the engine is broken.
    #[error(transparent)]
    Bridge(OracleError),
}

impl SampleError {
    /// Classify an oracle failure for `key`.
    #[must_use]
    pub fn from_oracle(key: SampleKey, error: OracleError) -> Self {
        match error {
            OracleError::Computation { kind, message } => Self::OracleComputation {
                key,
                message: format!("{kind}: {message}"),
            },
            OracleError::Snapshot { message } => Self::OracleComputation {
                key,
                message: format!("snapshot rejected: {message}"),
            },
            other => Self::Bridge(other),
        }
    }

    /// Whether the run must stop.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Bridge(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alm_core::enums::ConfigMode;
    use alm_core::sample::SampleTime;

    fn key() -> SampleKey {
        SampleKey::new(2024, 2, 4, SampleTime::MORNING, ConfigMode::Duty)
    }

    #[test]
    fn computation_errors_are_per_sample() {
        let err = SampleError::from_oracle(
            key(),
            OracleError::Computation {
                kind: "IndexError".into(),
                message: "list index out of range".into(),
            },
        );
        assert!(!err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Oracle failed for 2024-2-4 10:30 [duty]: IndexError: list index out of range"
        );
    }

    #[test]
    fn snapshot_errors_are_per_sample() {
        let err = SampleError::from_oracle(
            key(),
            OracleError::Snapshot {
                message: "invalid type: null, expected a string".into(),
            },
        );
        assert!(!err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Oracle failed for 2024-2-4 10:30 [duty]: snapshot rejected: invalid type: null, expected a string"
        );
    }

    #[test]
    fn transport_errors_are_fatal() {
        let err = SampleError::from_oracle(key(), OracleError::Protocol("garbage".into()));
        assert!(err.is_fatal());
        let err = SampleError::from_oracle(
            key(),
            OracleError::Exited {
                stderr: String::new(),
            },
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn exited_message_includes_stderr_when_present() {
        let err = OracleError::Exited {
            stderr: "ModuleNotFoundError: No module named 'cnlunar'\n".into(),
        };
        assert_eq!(
            err.to_string(),
            "Oracle exited unexpectedly: ModuleNotFoundError: No module named 'cnlunar'"
        );
        let bare = OracleError::Exited {
            stderr: " ".into(),
        };
        assert_eq!(bare.to_string(), "Oracle exited unexpectedly");
    }

    #[test]
    fn invalid_date_message_pads_components() {
        let err = SampleError::InvalidDate {
            year: 2023,
            month: 2,
            day: 30,
        };
        assert_eq!(err.to_string(), "Not a calendar date: 2023-02-30");
    }
}
