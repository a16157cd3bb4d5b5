//! Property checks over a finished fixture file.
//!
//! Needs no engine. The file is streamed twice: once for the SHA-256 digest
//! and once for the line checks.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, ErrorKind};
use std::path::Path;

use alm_core::enums::{ConfigMode, ViolationRule};
use alm_core::record::Record;
use alm_core::responses::{VerifyReport, Violation};
use alm_core::sample::{SAMPLES_PER_DAY, SampleTime, YearRange};
use alm_schema::registry::RECORD_SCHEMA;
use alm_schema::{CompiledSchema, SchemaRegistry};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use sha2::{Digest, Sha256};

use crate::enumerate::DAY_SAMPLES;
use crate::error::FixtureError;
use crate::normalize::INPUT_DATE_FORMAT;

#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// When set, dates must fall inside it and the record count must match.
    pub range: Option<YearRange>,
    /// Validate each line against the `record` JSON Schema.
    pub schema: bool,
    /// Cap on listed violations.
    pub max_errors: usize,
}

/// Check every line of the fixture at `path`.
///
/// # Errors
///
/// Returns `FixtureError::Open` if the file cannot be opened, or
/// `FixtureError::Io` on a read failure. Malformed lines are violations, not
/// errors.
pub fn verify(path: &Path, options: &VerifyOptions) -> Result<VerifyReport, FixtureError> {
    let sha256 = sha256_file(path)?;

    let schema = if options.schema {
        Some(SchemaRegistry::new().compile(RECORD_SCHEMA)?)
    } else {
        None
    };
    let mut checker = Checker::new(options, schema);

    let lines = serde_jsonlines::json_lines::<serde_json::Value, _>(path).map_err(|source| {
        FixtureError::Open {
            path: path.to_path_buf(),
            source,
        }
    })?;
    for line in lines {
        match line {
            Ok(value) => checker.check(value),
            Err(e) if matches!(e.kind(), ErrorKind::InvalidData | ErrorKind::UnexpectedEof) => {
                checker.malformed(&e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(checker.finish(path, sha256))
}

/// Lowercase hex SHA-256 of the file's bytes.
///
/// # Errors
///
/// Returns `FixtureError::Open` or `FixtureError::Io` on read failures.
pub fn sha256_file(path: &Path) -> Result<String, FixtureError> {
    let mut file = File::open(path).map_err(|source| FixtureError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Records of one calendar day seen so far.
struct DayGroup {
    date: NaiveDate,
    first_record: u64,
    slots: Vec<(SampleTime, ConfigMode)>,
}

struct Checker<'a> {
    options: &'a VerifyOptions,
    schema: Option<CompiledSchema>,
    records: u64,
    days: u64,
    group: Option<DayGroup>,
    last_date: Option<NaiveDate>,
    violation_count: u64,
    by_rule: BTreeMap<String, u64>,
    violations: Vec<Violation>,
}

impl<'a> Checker<'a> {
    fn new(options: &'a VerifyOptions, schema: Option<CompiledSchema>) -> Self {
        Self {
            options,
            schema,
            records: 0,
            days: 0,
            group: None,
            last_date: None,
            violation_count: 0,
            by_rule: BTreeMap::new(),
            violations: Vec::new(),
        }
    }

    fn report(
        &mut self,
        record: u64,
        input_date: Option<&str>,
        rule: ViolationRule,
        detail: String,
    ) {
        self.violation_count += 1;
        *self.by_rule.entry(rule.to_string()).or_default() += 1;
        if self.violations.len() < self.options.max_errors {
            self.violations.push(Violation {
                record,
                input_date: input_date.map(ToString::to_string),
                rule,
                detail,
            });
        }
    }

    fn malformed(&mut self, error: &io::Error) {
        self.records += 1;
        self.report(self.records, None, ViolationRule::Parse, error.to_string());
    }

    fn check(&mut self, value: serde_json::Value) {
        self.records += 1;
        let n = self.records;

        let schema_error = self
            .schema
            .as_ref()
            .and_then(|schema| schema.validate(&value).err());
        if let Some(e) = schema_error {
            let input_date = value.get("input_date").and_then(serde_json::Value::as_str);
            self.report(n, input_date, ViolationRule::Schema, e.to_string());
        }

        let record: Record = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                self.report(n, None, ViolationRule::Parse, format!("not a record: {e}"));
                return;
            }
        };
        let input_date = record.input_date.as_str();

        self.check_sets(n, &record);

        let next_date = &record.solar_terms.next_date;
        if !is_month_day(next_date) {
            self.report(
                n,
                Some(input_date),
                ViolationRule::NextDateFormat,
                format!("solar_terms.next_date {next_date:?} is not MM-DD"),
            );
        }

        let Some(at) = parse_input_date(input_date) else {
            self.report(
                n,
                Some(input_date),
                ViolationRule::InputDate,
                format!("{input_date:?} is not a real YYYY-MM-DD HH:MM timestamp"),
            );
            return;
        };
        if let Some(range) = self.options.range {
            if !range.contains(at.year()) {
                self.report(
                    n,
                    Some(input_date),
                    ViolationRule::InputDate,
                    format!("year {} is outside {range}", at.year()),
                );
            }
        }

        let slot = (
            SampleTime {
                hour: at.hour(),
                minute: at.minute(),
            },
            record.yeargod,
        );
        self.place(n, input_date, at.date(), slot);
    }

    fn check_sets(&mut self, n: u64, record: &Record) {
        let strict = [("yi", &record.yi), ("ji", &record.ji)];
        for (name, items) in strict {
            if !items.windows(2).all(|w| w[0] < w[1]) {
                self.report(
                    n,
                    Some(&record.input_date),
                    ViolationRule::UnsortedSet,
                    format!("{name} is not strictly ascending"),
                );
            }
        }
        let loose = [
            ("god_names.good", &record.god_names.good),
            ("god_names.bad", &record.god_names.bad),
        ];
        for (name, items) in loose {
            if !items.windows(2).all(|w| w[0] <= w[1]) {
                self.report(
                    n,
                    Some(&record.input_date),
                    ViolationRule::UnsortedSet,
                    format!("{name} is not ascending"),
                );
            }
        }
    }

    fn place(&mut self, n: u64, input_date: &str, date: NaiveDate, slot: (SampleTime, ConfigMode)) {
        let same_day = self.group.as_ref().is_some_and(|g| g.date == date);
        if !same_day {
            self.close_group();
            if let Some(last) = self.last_date {
                if date <= last {
                    self.report(
                        n,
                        Some(input_date),
                        ViolationRule::Ordering,
                        format!("{date} does not come after {last}"),
                    );
                }
            }
            self.last_date = Some(date);
            self.days += 1;
            self.group = Some(DayGroup {
                date,
                first_record: n,
                slots: Vec::with_capacity(4),
            });
        }
        if let Some(group) = &mut self.group {
            group.slots.push(slot);
        }
    }

    fn close_group(&mut self) {
        let Some(group) = self.group.take() else {
            return;
        };
        let expected: BTreeSet<(SampleTime, ConfigMode)> = DAY_SAMPLES.into_iter().collect();
        let seen: BTreeSet<(SampleTime, ConfigMode)> = group.slots.iter().copied().collect();
        let complete = group.slots.len() as u64 == SAMPLES_PER_DAY && seen == expected;
        if !complete {
            let slots: Vec<String> = group
                .slots
                .iter()
                .map(|(time, mode)| format!("{time} {mode}"))
                .collect();
            let date = group.date.to_string();
            self.report(
                group.first_record,
                Some(&date),
                ViolationRule::DayGroup,
                format!(
                    "{date} has {} contiguous records [{}], expected 10:30 and 23:30 in both modes",
                    group.slots.len(),
                    slots.join(", ")
                ),
            );
        }
    }

    fn finish(mut self, path: &Path, sha256: String) -> VerifyReport {
        self.close_group();

        let expected_records = self.options.range.map(|range| range.expected_records());
        if let Some(expected) = expected_records {
            if self.records != expected {
                self.report(
                    self.records,
                    None,
                    ViolationRule::CountParity,
                    format!("{} records, expected {expected}", self.records),
                );
            }
        }

        VerifyReport {
            path: path.display().to_string(),
            sha256,
            records: self.records,
            days: self.days,
            expected_records,
            schema_checked: self.schema.is_some(),
            passed: self.violation_count == 0,
            violation_count: self.violation_count,
            violations_by_rule: self.by_rule,
            violations: self.violations,
        }
    }
}

/// Parse `YYYY-MM-DD HH:MM`, rejecting anything that does not round-trip.
fn parse_input_date(text: &str) -> Option<NaiveDateTime> {
    let at = NaiveDateTime::parse_from_str(text, INPUT_DATE_FORMAT).ok()?;
    (at.format(INPUT_DATE_FORMAT).to_string() == text).then_some(at)
}

/// `MM-DD` with two ASCII digits on each side.
fn is_month_day(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 5
        && bytes[2] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("02-04", true)]
    #[case("12-31", true)]
    #[case("2-04", false)]
    #[case("02-4", false)]
    #[case("02/04", false)]
    #[case("ab-cd", false)]
    fn month_day_format(#[case] text: &str, #[case] ok: bool) {
        assert_eq!(is_month_day(text), ok);
    }

    #[rstest]
    #[case("2024-02-04 10:30", true)]
    #[case("2024-02-30 10:30", false)]
    #[case("2024-2-4 10:30", false)]
    #[case("2024-02-04 10:30:00", false)]
    #[case("2024-02-04T10:30", false)]
    fn input_date_format(#[case] text: &str, #[case] ok: bool) {
        assert_eq!(parse_input_date(text).is_some(), ok);
    }

    #[test]
    fn sha256_of_known_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.txt");
        std::fs::write(&path, "abc").unwrap();
        assert_eq!(
            sha256_file(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
