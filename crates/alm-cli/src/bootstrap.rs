use alm_config::AlmConfig;
use anyhow::Context;

/// Load `.env` from the working directory, then the layered config.
pub fn load_config() -> anyhow::Result<AlmConfig> {
    let config = AlmConfig::load_with_dotenv().context("failed to load almfx configuration")?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}
