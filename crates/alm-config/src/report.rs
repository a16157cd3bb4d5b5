//! Verify and compare report settings.

use serde::{Deserialize, Serialize};

const fn default_max_errors() -> usize {
    200
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Maximum violations or mismatches listed in a report. Totals are
    /// always exact.
    #[serde(default = "default_max_errors")]
    pub max_errors: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_errors: default_max_errors(),
        }
    }
}
