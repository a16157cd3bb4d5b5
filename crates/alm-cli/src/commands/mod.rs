pub mod compare;
pub mod generate;
pub mod sample;
pub mod schema;
pub mod verify;

use alm_config::AlmConfig;
use alm_oracle::{CnlunarBridge, OracleAdapter};
use anyhow::Context;

use crate::cli::{Commands, GlobalFlags};

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: &Commands, config: &AlmConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Generate => generate::handle(config, flags),
        Commands::Sample(args) => sample::handle(args, config, flags),
        Commands::Verify(args) => verify::handle(args, config, flags),
        Commands::Compare(args) => compare::handle(args, config, flags),
        Commands::Schema(args) => schema::handle(args, flags),
    }
}

/// Start the configured Python engine and wrap it in an adapter.
fn open_oracle(config: &AlmConfig) -> anyhow::Result<OracleAdapter<CnlunarBridge>> {
    let bridge = CnlunarBridge::spawn(&config.oracle.python).with_context(|| {
        format!(
            "failed to start the cnlunar engine with '{}'",
            config.oracle.python
        )
    })?;
    Ok(OracleAdapter::new(bridge, config.oracle.god_type.clone()))
}
