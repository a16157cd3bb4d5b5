//! # alm-config
//!
//! Layered configuration loading for almfx using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ALMFX_*` prefix, `__` as separator)
//! 2. Project-level `.almfx/config.toml`
//! 3. User-level `~/.config/almfx/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ALMFX_RANGE__START_YEAR` -> `range.start_year`,
//! `ALMFX_OUTPUT__PATH` -> `output.path`, etc. The `__` (double underscore)
//! separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use alm_config::AlmConfig;
//!
//! let config = AlmConfig::load_with_dotenv().expect("config");
//! let range = config.range.year_range().expect("valid range");
//! println!("writing {} to {}", range, config.output.path);
//! ```

mod error;
mod oracle;
mod output;
mod range;
mod report;

pub use error::ConfigError;
pub use oracle::OracleConfig;
pub use output::OutputConfig;
pub use range::RangeConfig;
pub use report::ReportConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AlmConfig {
    #[serde(default)]
    pub range: RangeConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl AlmConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".almfx/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("ALMFX_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("almfx").join("config.toml"))
    }
}
