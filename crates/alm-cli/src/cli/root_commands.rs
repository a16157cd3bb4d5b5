use std::path::PathBuf;

use alm_core::enums::ConfigMode;
use alm_core::sample::SampleTime;
use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Write the full fixture for the configured year range.
    Generate,
    /// Compute and print the record for one date, time and mode.
    Sample(SampleArgs),
    /// Check a fixture file's structural properties.
    Verify(VerifyArgs),
    /// Compare two fixture files section by section.
    Compare(CompareArgs),
    /// Dump JSON schema for a registered type.
    Schema(SchemaArgs),
}

/// A `YYYY-MM-DD` triple that may name an impossible day.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// Parse `YYYY-MM-DD` without checking that the day exists.
pub fn parse_date_parts(value: &str) -> Result<DateParts, String> {
    let invalid = || format!("invalid date '{value}' (expected YYYY-MM-DD)");
    let mut parts = value.split('-');
    let (Some(y), Some(m), Some(d), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    if y.len() != 4 || m.len() != 2 || d.len() != 2 {
        return Err(invalid());
    }
    Ok(DateParts {
        year: y.parse().map_err(|_| invalid())?,
        month: m.parse().map_err(|_| invalid())?,
        day: d.parse().map_err(|_| invalid())?,
    })
}

/// Arguments for `almfx sample`.
#[derive(Clone, Debug, Args)]
pub struct SampleArgs {
    /// Date to sample (YYYY-MM-DD). Defaults to today.
    #[arg(short, long, value_parser = parse_date_parts)]
    pub date: Option<DateParts>,
    /// Time of day (HH:MM).
    #[arg(short, long, default_value = "12:00")]
    pub time: SampleTime,
    /// Year-deity mode: duty or noduty.
    #[arg(short, long, default_value = "noduty")]
    pub mode: ConfigMode,
}

/// Arguments for `almfx verify`.
#[derive(Clone, Debug, Args)]
pub struct VerifyArgs {
    /// Fixture file (defaults to `output.path`).
    pub path: Option<PathBuf>,
    /// Also validate every line against the record JSON Schema.
    #[arg(long)]
    pub schema: bool,
    /// Do not check dates and record count against the configured range.
    #[arg(long)]
    pub skip_parity: bool,
    /// Maximum violations to list (defaults to `report.max_errors`).
    #[arg(long)]
    pub max_errors: Option<usize>,
}

/// Arguments for `almfx compare`.
#[derive(Clone, Debug, Args)]
pub struct CompareArgs {
    /// Reference fixture.
    pub expected: PathBuf,
    /// Fixture under test.
    pub actual: PathBuf,
    /// Maximum mismatches to list (defaults to `report.max_errors`).
    #[arg(long)]
    pub max_errors: Option<usize>,
}

/// Arguments for `almfx schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Registered type name.
    #[arg(default_value = "record")]
    pub type_name: String,
    /// List registered type names instead.
    #[arg(long)]
    pub list: bool,
}
