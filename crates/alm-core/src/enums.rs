//! Configuration modes, line styles, and verification rules.
//!
//! All enums serialize to lowercase / `snake_case` strings and provide
//! `as_str()` for log fields and report keys.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// ConfigMode
// ---------------------------------------------------------------------------

/// Oracle behavior variant: whether the year-level duty deity table is consulted.
///
/// Serialized as the oracle's own `yeargod` values: `"duty"` and `"noduty"`.
/// The mode never changes the sampled calendar date.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ConfigMode {
    Duty,
    NoDuty,
}

impl ConfigMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Duty => "duty",
            Self::NoDuty => "noduty",
        }
    }
}

impl fmt::Display for ConfigMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "duty" => Ok(Self::Duty),
            "noduty" | "no_duty" | "no-duty" => Ok(Self::NoDuty),
            other => Err(CoreError::InvalidMode(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// LineStyle
// ---------------------------------------------------------------------------

/// How a record is rendered onto its output line.
///
/// `Python` uses `", "` and `": "` separators so the bytes match fixtures
/// produced with `json.dumps(record, ensure_ascii=False)`. `Compact` uses no
/// whitespace at all. Neither style escapes non-ASCII characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Python,
    Compact,
}

impl LineStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Compact => "compact",
        }
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ViolationRule
// ---------------------------------------------------------------------------

/// A fixture property checked by `almfx verify`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ViolationRule {
    /// The line is not a well-formed record.
    Parse,
    /// The record does not validate against the `record` JSON Schema.
    Schema,
    /// `input_date` is not a real `YYYY-MM-DD HH:MM` timestamp.
    InputDate,
    /// A set-like list is not strictly ascending (unsorted or duplicated).
    UnsortedSet,
    /// `solar_terms.next_date` is not two zero-padded two-digit components.
    NextDateFormat,
    /// A calendar day does not have exactly its four contiguous samples.
    DayGroup,
    /// Calendar days are not in strictly ascending order.
    Ordering,
    /// Total record count differs from the configured range's expectation.
    CountParity,
}

impl ViolationRule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Schema => "schema",
            Self::InputDate => "input_date",
            Self::UnsortedSet => "unsorted_set",
            Self::NextDateFormat => "next_date_format",
            Self::DayGroup => "day_group",
            Self::Ordering => "ordering",
            Self::CountParity => "count_parity",
        }
    }
}

impl fmt::Display for ViolationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
