//! Response types returned as JSON by `almfx` commands.
//!
//! These structs define the shape of JSON output for `almfx generate`,
//! `almfx verify`, and `almfx compare`. None of them carry wall-clock
//! timestamps except `GenerateSummary::elapsed_ms`, which is informational.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ViolationRule;
use crate::sample::YearRange;

/// Response from `almfx generate`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GenerateSummary {
    pub output: String,
    pub range: YearRange,
    /// Records written to the output file.
    pub records: u64,
    /// Samples skipped because the engine raised an error.
    pub oracle_failures: u64,
    pub elapsed_ms: u64,
}

/// A single property violation found by `almfx verify`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Violation {
    /// 1-based record position in the file.
    pub record: u64,
    pub input_date: Option<String>,
    pub rule: ViolationRule,
    pub detail: String,
}

/// Response from `almfx verify`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VerifyReport {
    pub path: String,
    /// Lowercase hex SHA-256 of the file bytes.
    pub sha256: String,
    pub records: u64,
    pub days: u64,
    pub expected_records: Option<u64>,
    pub schema_checked: bool,
    pub passed: bool,
    pub violation_count: u64,
    /// Violation counts keyed by rule name.
    pub violations_by_rule: BTreeMap<String, u64>,
    /// First violations, capped by `report.max_errors`.
    pub violations: Vec<Violation>,
}

/// One record that differs between two fixtures.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompareMismatch {
    /// 1-based record position.
    pub record: u64,
    pub input_date: String,
    pub yeargod: String,
    /// Section names that differ, or `identity` when the records are misaligned.
    pub sections: Vec<String>,
}

/// Response from `almfx compare`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompareReport {
    pub expected: String,
    pub actual: String,
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    /// `passed / total` as a percentage with four decimals, e.g. `"99.9875%"`.
    pub pass_rate: String,
    /// Records present only in the expected file.
    pub missing: u64,
    /// Records present only in the actual file.
    pub extra: u64,
    pub section_failures: BTreeMap<String, u64>,
    /// First mismatches, capped by `report.max_errors`.
    pub mismatches: Vec<CompareMismatch>,
}

impl CompareReport {
    #[must_use]
    pub const fn is_identical(&self) -> bool {
        self.failed == 0 && self.missing == 0 && self.extra == 0
    }
}
