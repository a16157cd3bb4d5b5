use std::path::PathBuf;

use alm_config::AlmConfig;
use alm_fixture::{VerifyOptions, verify};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::VerifyArgs;
use crate::output::output;

/// Handle `almfx verify`. Fails when any violation is found.
pub fn handle(args: &VerifyArgs, config: &AlmConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let path = args
        .path
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.path));
    let range = if args.skip_parity {
        None
    } else {
        Some(config.range.year_range()?)
    };
    let options = VerifyOptions {
        range,
        schema: args.schema,
        max_errors: args.max_errors.unwrap_or(config.report.max_errors),
    };

    let report = verify(&path, &options)?;
    output(&report, flags.format)?;

    if !report.passed {
        anyhow::bail!(
            "{} violation(s) in {}",
            report.violation_count,
            path.display()
        );
    }
    Ok(())
}
