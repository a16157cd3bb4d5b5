//! Calendrical engine settings.

use serde::{Deserialize, Serialize};

fn default_python() -> String {
    "python3".to_string()
}

fn default_god_type() -> String {
    "8char".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
    /// Interpreter that has the `cnlunar` package installed.
    #[serde(default = "default_python")]
    pub python: String,

    /// Deity-calculation flavour passed to the engine as `godType`.
    #[serde(default = "default_god_type")]
    pub god_type: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            god_type: default_god_type(),
        }
    }
}
