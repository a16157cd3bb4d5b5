use alm_config::AlmConfig;
use alm_fixture::{CompareOptions, compare};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CompareArgs;
use crate::output::output;

/// Handle `almfx compare`. Fails unless the fixtures match record for record.
pub fn handle(args: &CompareArgs, config: &AlmConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let options = CompareOptions {
        max_errors: args.max_errors.unwrap_or(config.report.max_errors),
    };

    let report = compare(&args.expected, &args.actual, &options)?;
    output(&report, flags.format)?;

    if !report.is_identical() {
        anyhow::bail!(
            "fixtures differ: {} failed, {} missing, {} extra (pass rate {})",
            report.failed,
            report.missing,
            report.extra,
            report.pass_rate
        );
    }
    Ok(())
}
