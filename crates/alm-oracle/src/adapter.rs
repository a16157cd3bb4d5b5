//! Sample key to observation.

use alm_core::sample::SampleKey;

use crate::error::SampleError;
use crate::{Observation, Oracle, OracleRequest};

/// Wraps an [`Oracle`] and applies the per-sample classification rules.
pub struct OracleAdapter<O> {
    oracle: O,
    god_type: String,
}

impl<O: Oracle> OracleAdapter<O> {
    pub fn new(oracle: O, god_type: impl Into<String>) -> Self {
        Self {
            oracle,
            god_type: god_type.into(),
        }
    }

    /// Build the request for `key` without contacting the oracle.
    ///
    /// # Errors
    ///
    /// `SampleError::InvalidDate` when the key's day does not exist.
    pub fn request(&self, key: SampleKey) -> Result<OracleRequest, SampleError> {
        let at = key.date_time().ok_or_else(|| SampleError::InvalidDate {
            year: key.year,
            month: key.month,
            day: key.day,
        })?;
        Ok(OracleRequest {
            key,
            at,
            god_type: self.god_type.clone(),
        })
    }

    /// Query the oracle for one sample.
    ///
    /// # Errors
    ///
    /// - `SampleError::InvalidDate`: impossible date, the oracle is not called
    /// - `SampleError::OracleComputation`: the engine raised for this sample
    /// - `SampleError::Bridge`: the engine is unreachable
    pub fn fetch(&mut self, key: SampleKey) -> Result<Observation, SampleError> {
        let request = self.request(key)?;
        let snapshot = self
            .oracle
            .query(&request)
            .map_err(|error| SampleError::from_oracle(key, error))?;
        Ok(Observation { request, snapshot })
    }

    #[must_use]
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }
}
