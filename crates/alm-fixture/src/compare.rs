//! Section-by-section comparison of two fixture files.
//!
//! Records are aligned by position. A pair whose `input_date` or `yeargod`
//! differ is reported under the `identity` pseudo-section and its sections
//! are not compared.

use std::collections::BTreeMap;
use std::path::Path;

use alm_core::record::{SECTIONS, UNORDERED_SECTIONS};
use alm_core::responses::{CompareMismatch, CompareReport};
use serde_json::Value;

use crate::error::FixtureError;

/// Pseudo-section reported when two records describe different samples.
pub const IDENTITY: &str = "identity";

#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Cap on listed mismatches.
    pub max_errors: usize,
}

/// Compare `actual` against `expected`.
///
/// # Errors
///
/// Returns `FixtureError::Open` if either file cannot be opened,
/// `FixtureError::Malformed` for a line that is not JSON, or
/// `FixtureError::Io` on a read failure.
pub fn compare(
    expected: &Path,
    actual: &Path,
    options: &CompareOptions,
) -> Result<CompareReport, FixtureError> {
    let mut expected_lines = Lines::open(expected)?;
    let mut actual_lines = Lines::open(actual)?;

    let mut report = CompareReport {
        expected: expected.display().to_string(),
        actual: actual.display().to_string(),
        total: 0,
        passed: 0,
        failed: 0,
        pass_rate: String::new(),
        missing: 0,
        extra: 0,
        section_failures: BTreeMap::new(),
        mismatches: Vec::new(),
    };

    loop {
        match (expected_lines.next()?, actual_lines.next()?) {
            (None, None) => break,
            (Some(_), None) => report.missing += 1,
            (None, Some(_)) => report.extra += 1,
            (Some(want), Some(got)) => {
                report.total += 1;
                let sections = differing_sections(&want, &got);
                if sections.is_empty() {
                    report.passed += 1;
                    continue;
                }
                report.failed += 1;
                for section in &sections {
                    *report.section_failures.entry((*section).to_string()).or_default() += 1;
                }
                if report.mismatches.len() < options.max_errors {
                    report.mismatches.push(CompareMismatch {
                        record: report.total,
                        input_date: text_field(&want, "input_date"),
                        yeargod: text_field(&want, "yeargod"),
                        sections: sections.iter().map(ToString::to_string).collect(),
                    });
                }
            }
        }
    }

    report.pass_rate = pass_rate(report.passed, report.total);
    Ok(report)
}

/// Names of the sections in which two records differ, in record order.
#[must_use]
pub fn differing_sections(want: &Value, got: &Value) -> Vec<&'static str> {
    let identity_matches = want.get("input_date") == got.get("input_date")
        && want.get("yeargod") == got.get("yeargod");
    if !identity_matches {
        return vec![IDENTITY];
    }

    SECTIONS
        .iter()
        .copied()
        .filter(|section| {
            let (a, b) = (want.get(*section), got.get(*section));
            if UNORDERED_SECTIONS.contains(section) {
                a.map(unordered) != b.map(unordered)
            } else {
                a != b
            }
        })
        .collect()
}

/// `passed / total` as a percentage with four decimals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pass_rate(passed: u64, total: u64) -> String {
    if total == 0 {
        return "0.0000%".to_string();
    }
    format!("{:.4}%", passed as f64 / total as f64 * 100.0)
}

/// Sort every array inside `value` so list order stops mattering.
fn unordered(value: &Value) -> Value {
    match value {
        Value::Array(items) => {
            let mut items: Vec<Value> = items.iter().map(unordered).collect();
            items.sort_by_cached_key(ToString::to_string);
            Value::Array(items)
        }
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), unordered(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn text_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// A fixture file read one JSON value at a time, with line numbers.
struct Lines {
    path: std::path::PathBuf,
    line: u64,
    inner: serde_jsonlines::JsonLinesIter<std::io::BufReader<std::fs::File>, Value>,
}

impl Lines {
    fn open(path: &Path) -> Result<Self, FixtureError> {
        let inner = serde_jsonlines::json_lines(path).map_err(|source| FixtureError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            line: 0,
            inner,
        })
    }

    fn next(&mut self) -> Result<Option<Value>, FixtureError> {
        match self.inner.next() {
            None => Ok(None),
            Some(Ok(value)) => {
                self.line += 1;
                Ok(Some(value))
            }
            Some(Err(e)) => {
                self.line += 1;
                match e.kind() {
                    std::io::ErrorKind::InvalidData | std::io::ErrorKind::UnexpectedEof => {
                        Err(FixtureError::Malformed {
                            path: self.path.clone(),
                            line: self.line,
                            message: e.to_string(),
                        })
                    }
                    _ => Err(e.into()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "input_date": "2024-02-04 10:30",
            "yeargod": "noduty",
            "bazi": {"year": "甲辰", "month": "丙寅"},
            "directions": ["喜神东南", "财神正北"],
            "yi": ["出行", "祭祀"],
            "god_names": {"good": ["天德", "月德"], "bad": []},
            "two_hour": {"list": ["壬子", "癸丑"]}
        })
    }

    #[test]
    fn identical_records_have_no_differences() {
        assert!(differing_sections(&record(), &record()).is_empty());
    }

    #[test]
    fn unordered_sections_ignore_list_order() {
        let mut got = record();
        got["directions"] = json!(["财神正北", "喜神东南"]);
        got["yi"] = json!(["祭祀", "出行"]);
        got["god_names"]["good"] = json!(["月德", "天德"]);
        assert!(differing_sections(&record(), &got).is_empty());
    }

    #[test]
    fn ordered_sections_respect_list_order() {
        let mut got = record();
        got["two_hour"]["list"] = json!(["癸丑", "壬子"]);
        assert_eq!(differing_sections(&record(), &got), vec!["two_hour"]);
    }

    #[test]
    fn reports_every_differing_section_in_record_order() {
        let mut got = record();
        got["yi"] = json!(["出行"]);
        got["bazi"]["year"] = json!("癸卯");
        assert_eq!(differing_sections(&record(), &got), vec!["bazi", "yi"]);
    }

    #[test]
    fn misaligned_records_are_identity_mismatches() {
        let mut got = record();
        got["yeargod"] = json!("duty");
        got["bazi"] = json!({});
        assert_eq!(differing_sections(&record(), &got), vec![IDENTITY]);
    }

    #[test]
    fn pass_rate_has_four_decimals() {
        assert_eq!(pass_rate(3, 4), "75.0000%");
        assert_eq!(pass_rate(2, 3), "66.6667%");
        assert_eq!(pass_rate(10, 10), "100.0000%");
        assert_eq!(pass_rate(0, 0), "0.0000%");
    }
}
