//! Generation driver.
//!
//! Strictly sequential: each sample is fetched, normalized and written before
//! the next key is produced. Per-sample outcomes:
//! - impossible date: skipped silently, not counted, not logged
//! - engine exception: logged at `warn`, counted, skipped
//! - broken engine transport or failed write: the run stops with an error

use std::path::PathBuf;
use std::time::Instant;

use alm_core::enums::LineStyle;
use alm_core::record::Record;
use alm_core::responses::GenerateSummary;
use alm_core::sample::{SampleKey, YearRange};
use alm_oracle::{Oracle, OracleAdapter, SampleError};
use alm_schema::SchemaRegistry;
use alm_schema::registry::RECORD_SCHEMA;
use tracing::{info, trace, warn};

use crate::enumerate::year_samples;
use crate::error::FixtureError;
use crate::normalize::normalize;
use crate::writer::FixtureWriter;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub range: YearRange,
    pub output: PathBuf,
    pub line_style: LineStyle,
    pub validate_schema: bool,
}

/// Receives per-year progress from [`generate`].
pub trait ProgressObserver {
    fn year_started(&mut self, _year: i32) {}
    fn year_finished(&mut self, _year: i32, _records_so_far: u64) {}
}

/// Ignores all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Write the fixture for `options.range` to `options.output`.
///
/// The output file is truncated first. Records appear in enumeration order.
///
/// # Errors
///
/// - `FixtureError::Open` / `FixtureError::Io` when the output cannot be written
/// - `FixtureError::Oracle` when the engine becomes unreachable
/// - `FixtureError::Schema` when `validate_schema` is set and the record
///   schema cannot be compiled
pub fn generate<O: Oracle>(
    adapter: &mut OracleAdapter<O>,
    options: &GenerateOptions,
    progress: &mut dyn ProgressObserver,
) -> Result<GenerateSummary, FixtureError> {
    let start = Instant::now();
    let mut writer = FixtureWriter::create(&options.output, options.line_style)?;
    if options.validate_schema {
        writer = writer.with_validation(SchemaRegistry::new().compile(RECORD_SCHEMA)?);
    }

    info!(
        range = %options.range,
        output = %options.output.display(),
        "generating fixture"
    );

    let mut oracle_failures = 0u64;
    for year in options.range.years() {
        if year % 10 == 0 {
            info!(year, records = writer.written(), "processing year");
        }
        progress.year_started(year);

        for key in year_samples(year) {
            match sample(adapter, key) {
                Ok(record) => writer.write(&record)?,
                Err(SampleError::InvalidDate { .. }) => {}
                Err(SampleError::OracleComputation { key, message }) => {
                    warn!(sample = %key, "oracle computation failed, sample skipped: {message}");
                    oracle_failures += 1;
                }
                Err(SampleError::Bridge(e)) => return Err(e.into()),
            }
        }

        progress.year_finished(year, writer.written());
    }

    let records = writer.written();
    writer.finish()?;

    let summary = GenerateSummary {
        output: options.output.display().to_string(),
        range: options.range,
        records,
        oracle_failures,
        elapsed_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    };
    info!(
        records = summary.records,
        oracle_failures = summary.oracle_failures,
        output = %summary.output,
        elapsed_ms = summary.elapsed_ms,
        "fixture complete"
    );
    Ok(summary)
}

/// Fetch and normalize a single sample.
///
/// # Errors
///
/// The adapter's classification: `InvalidDate`, `OracleComputation`, or `Bridge`.
pub fn sample<O: Oracle>(
    adapter: &mut OracleAdapter<O>,
    key: SampleKey,
) -> Result<Record, SampleError> {
    let observation = adapter.fetch(key)?;
    trace!(sample = %key, "observed");
    Ok(normalize(&observation))
}
