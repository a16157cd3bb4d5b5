//! Year range to enumerate.

use alm_core::sample::YearRange;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_start_year() -> i32 {
    1901
}

const fn default_end_year() -> i32 {
    2099
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RangeConfig {
    /// First Gregorian year sampled (inclusive).
    #[serde(default = "default_start_year")]
    pub start_year: i32,

    /// Last Gregorian year sampled (inclusive).
    #[serde(default = "default_end_year")]
    pub end_year: i32,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            end_year: default_end_year(),
        }
    }
}

impl RangeConfig {
    /// The configured range, validated.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the bounds are reversed or fall
    /// outside `1..=9999`.
    pub fn year_range(&self) -> Result<YearRange, ConfigError> {
        YearRange::new(self.start_year, self.end_year).map_err(|e| ConfigError::InvalidValue {
            field: "range".to_string(),
            reason: e.to_string(),
        })
    }
}
