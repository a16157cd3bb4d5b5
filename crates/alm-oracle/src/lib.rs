//! # alm-oracle
//!
//! The calendrical engine seam for almfx.
//!
//! - [`Oracle`]: anything that turns an [`OracleRequest`] into an
//!   [`OracleSnapshot`] with every lazy attribute already materialized
//! - [`CnlunarBridge`]: the production oracle, a long-lived Python process
//!   running the `cnlunar` package behind a JSON-lines protocol
//! - [`OracleAdapter`]: builds requests from sample keys and classifies
//!   failures into [`SampleError`]
//!
//! With the `test-support` feature, `testing::ScriptedOracle` provides a
//! deterministic in-memory oracle for downstream test suites.

pub mod adapter;
pub mod bridge;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use adapter::OracleAdapter;
pub use bridge::CnlunarBridge;
pub use error::{OracleError, SampleError};

use alm_core::sample::SampleKey;
use alm_core::snapshot::OracleSnapshot;
use chrono::NaiveDateTime;

/// A fully resolved query for one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRequest {
    pub key: SampleKey,
    /// The sampled instant. Always a real date and time.
    pub at: NaiveDateTime,
    /// Engine deity-calculation flavour, e.g. `8char`.
    pub god_type: String,
}

/// A request paired with the engine's answer, ready for normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub request: OracleRequest,
    pub snapshot: OracleSnapshot,
}

/// A calendrical engine.
pub trait Oracle {
    /// Compute the full attribute set for one sample.
    ///
    /// # Errors
    ///
    /// `OracleError::Computation` when the engine raised for this sample and
    /// `OracleError::Snapshot` when its answer does not decode; any other
    /// variant when the engine can no longer be reached.
    fn query(&mut self, request: &OracleRequest) -> Result<OracleSnapshot, OracleError>;
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    fn query(&mut self, request: &OracleRequest) -> Result<OracleSnapshot, OracleError> {
        (**self).query(request)
    }
}
