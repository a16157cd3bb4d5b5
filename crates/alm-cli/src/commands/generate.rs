use std::path::PathBuf;

use alm_config::AlmConfig;
use alm_fixture::{GenerateOptions, generate};

use crate::cli::GlobalFlags;
use crate::output::output;
use crate::progress::Progress;

/// Handle `almfx generate`.
pub fn handle(config: &AlmConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let range = config.range.year_range()?;
    let options = GenerateOptions {
        range,
        output: PathBuf::from(&config.output.path),
        line_style: config.output.line_style,
        validate_schema: config.output.validate_schema,
    };

    let mut adapter = super::open_oracle(config)?;
    let mut progress = Progress::bar(range.year_count(), "generating");

    let summary = match generate(&mut adapter, &options, &mut progress) {
        Ok(summary) => summary,
        Err(error) => {
            progress.finish_err("generation failed");
            return Err(error.into());
        }
    };
    progress.finish_clear();

    output(&summary, flags.format)
}
