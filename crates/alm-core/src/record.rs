//! The canonical fixture record.
//!
//! One `Record` is one output line. Field order here is the serialized key
//! order, and every key is always present: absent values are empty strings or
//! empty lists, never missing keys.
//!
//! Invariants upheld by the normalizer (and checked by `almfx verify`):
//! - `yi`, `ji`, `god_names.good`, `god_names.bad` are strictly ascending
//! - `solar_terms.next_date` is `MM-DD` with two zero-padded components
//! - `solar_terms.this_year_table` keeps the engine's term order and renders
//!   each date as a plain `[month, day]` list
//! - `input_date` is `YYYY-MM-DD HH:MM` taken from the sample, not the engine

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::enums::ConfigMode;

/// Record sections compared independently by `almfx compare`, in record order.
pub const SECTIONS: &[&str] = &[
    "lunar",
    "bazi",
    "solar_terms",
    "deities",
    "clash",
    "five_elements",
    "peng_taboo",
    "two_hour",
    "directions",
    "fetal_god",
    "yi",
    "ji",
    "god_names",
    "thing_level",
    "thing_level_name",
    "holidays",
];

/// Sections whose list values carry no meaningful order.
pub const UNORDERED_SECTIONS: &[&str] = &["directions", "yi", "ji", "god_names"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Record {
    /// Sampled timestamp, `YYYY-MM-DD HH:MM`.
    pub input_date: String,
    pub yeargod: ConfigMode,
    pub lunar: LunarDate,
    pub bazi: Bazi,
    pub solar_terms: SolarTerms,
    pub deities: Deities,
    pub clash: ZodiacClash,
    pub five_elements: FiveElements,
    pub peng_taboo: PengTaboo,
    pub two_hour: TwoHour,
    pub directions: Vec<String>,
    pub fetal_god: String,
    pub yi: Vec<String>,
    pub ji: Vec<String>,
    pub god_names: GodNames,
    pub thing_level: i32,
    pub thing_level_name: String,
    pub holidays: Holidays,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LunarDate {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub is_leap: bool,
    pub year_cn: String,
    pub month_cn: String,
    pub day_cn: String,
    pub week_day: String,
    pub season: String,
    pub season_name: String,
    pub month_type: String,
    pub zodiac_year: String,
}

/// Four pillars plus the earthly-branch indices of year, month and day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Bazi {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub year_num: i32,
    pub month_num: i32,
    pub day_num: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SolarTerms {
    pub today: String,
    pub next_name: String,
    /// `MM-DD`.
    pub next_date: String,
    pub next_year: i32,
    #[schemars(with = "BTreeMap<String, [u32; 2]>")]
    pub this_year_table: SolarTermTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Deities {
    pub officer12: String,
    pub god12: String,
    pub day_type: String,
    pub star28: String,
    pub fly9: String,
    pub star_zodiac: String,
    pub east_zodiac: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ZodiacClash {
    pub desc: String,
    pub mark3: Vec<String>,
    pub mark6: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FiveElements {
    pub full_desc: Vec<String>,
    pub nayin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PengTaboo {
    pub full: String,
    pub short: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TwoHour {
    pub list: Vec<String>,
    pub lucky: Vec<String>,
    pub meridians: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GodNames {
    pub good: Vec<String>,
    pub bad: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Holidays {
    pub legal: String,
    pub other: String,
    pub lunar: String,
}

// ---------------------------------------------------------------------------
// SolarTermTable
// ---------------------------------------------------------------------------

/// A solar term and the `(month, day)` it falls on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolarTermDate {
    pub name: String,
    pub month: u32,
    pub day: u32,
}

/// Ordered mapping from term name to `[month, day]`.
///
/// Serialized as a JSON object whose keys keep insertion order, which a
/// `BTreeMap` or `HashMap` would not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolarTermTable(Vec<SolarTermDate>);

impl SolarTermTable {
    #[must_use]
    pub const fn new(entries: Vec<SolarTermDate>) -> Self {
        Self(entries)
    }

    #[must_use]
    pub fn entries(&self) -> &[SolarTermDate] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<(u32, u32)> {
        self.0
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| (entry.month, entry.day))
    }
}

impl Serialize for SolarTermTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.name, &[entry.month, entry.day])?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SolarTermTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = SolarTermTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of solar term names to [month, day]")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(24));
                while let Some((name, [month, day])) = access.next_entry::<String, [u32; 2]>()? {
                    entries.push(SolarTermDate { name, month, day });
                }
                Ok(SolarTermTable(entries))
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
