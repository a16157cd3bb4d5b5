use alm_config::AlmConfig;
use alm_core::sample::SampleKey;
use alm_fixture::sample;
use alm_fixture::writer::render_line;
use chrono::{Datelike, Local};

use crate::cli::root_commands::{DateParts, SampleArgs};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

/// Handle `almfx sample`.
pub fn handle(args: &SampleArgs, config: &AlmConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let date = args.date.unwrap_or_else(|| {
        let today = Local::now().date_naive();
        DateParts {
            year: today.year(),
            month: today.month(),
            day: today.day(),
        }
    });
    let key = SampleKey::new(date.year, date.month, date.day, args.time, args.mode);

    let mut adapter = super::open_oracle(config)?;
    let record = sample(&mut adapter, key)?;

    match flags.format {
        OutputFormat::Json => output(&record, flags.format),
        OutputFormat::Raw => {
            println!("{}", render_line(&record, config.output.line_style)?);
            Ok(())
        }
    }
}
