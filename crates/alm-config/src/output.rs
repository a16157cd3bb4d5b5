//! Fixture output settings.

use alm_core::enums::LineStyle;
use serde::{Deserialize, Serialize};

fn default_path() -> String {
    "full_test.json".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Destination of the JSONL fixture. Truncated on every run.
    #[serde(default = "default_path")]
    pub path: String,

    /// Separator style of each JSON line.
    #[serde(default)]
    pub line_style: LineStyle,

    /// Validate every record against the `record` schema before writing.
    /// Failures are logged, never fatal.
    #[serde(default)]
    pub validate_schema: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            line_style: LineStyle::default(),
            validate_schema: false,
        }
    }
}
