//! Raw attribute bag returned by the calendrical engine for one sample.
//!
//! Every lazily computed attribute of the engine is already materialized when
//! an `OracleSnapshot` exists: the bridge triggers them all before replying,
//! so reading fields here never has a first-access side effect.
//!
//! Field names follow the engine's attributes in `snake_case`. Nothing here is
//! sorted, padded, or defaulted; that is the normalizer's job.

use serde::{Deserialize, Serialize};

/// Raw return value of the engine's 12-day-officer method.
///
/// The engine is expected to return an `(officer, god, day_type)` tuple. Any
/// other shape is carried through as its textual representation so the
/// normalizer can apply its fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OfficerResult {
    Tuple { items: Vec<String> },
    Other { repr: String },
}

impl OfficerResult {
    /// The day type, only when the result is literally a 3-tuple.
    #[must_use]
    pub fn day_type(&self) -> Option<&str> {
        match self {
            Self::Tuple { items } if items.len() == 3 => Some(items[2].as_str()),
            _ => None,
        }
    }
}

/// One `(name, (month, day))` entry of the engine's yearly solar-term table.
pub type SolarTermEntry = (String, (u32, u32));

/// Full, unnormalized engine output for one `SampleKey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleSnapshot {
    // Lunar date
    pub lunar_year: i32,
    pub lunar_month: i32,
    pub lunar_day: i32,
    pub is_lunar_leap_month: bool,
    pub lunar_year_cn: String,
    pub lunar_month_cn: String,
    pub lunar_day_cn: String,
    pub week_day_cn: String,
    pub lunar_season: String,
    pub lunar_season_name: String,
    pub lunar_month_type: String,
    pub chinese_year_zodiac: String,

    // Eight characters
    pub year8_char: String,
    pub month8_char: String,
    pub day8_char: String,
    pub twohour8_char: String,
    pub year_earth_num: i32,
    pub month_earth_num: i32,
    pub day_earth_num: i32,

    // Solar terms
    pub today_solar_terms: String,
    pub next_solar_term: String,
    pub next_solar_term_date: (u32, u32),
    pub next_solar_term_year: i32,
    /// In the engine's insertion order.
    pub this_year_solar_terms: Vec<SolarTermEntry>,

    // Deities
    pub day_officer: OfficerResult,
    pub today12_day_officer: String,
    pub today12_day_god: String,
    pub day_name: String,
    pub today28_star: String,
    pub the9_fly_star: String,
    pub star_zodiac: String,
    pub today_east_zodiac: String,

    // Zodiac clash
    pub chinese_zodiac_clash: String,
    pub zodiac_mark3_list: Vec<String>,
    pub zodiac_mark6: String,

    // Five elements
    pub today5_elements: Vec<String>,
    pub nayin: String,

    // Peng-zu taboo
    pub peng_taboo_full: String,
    pub peng_taboo_short: String,

    // Double hours
    pub twohour8_char_list: Vec<String>,
    pub twohour_lucky_list: Vec<String>,
    pub meridians: String,

    pub lucky_gods_direction: Vec<String>,
    pub fetal_god: String,

    // Auspices, in engine iteration order
    pub good_thing: Vec<String>,
    pub bad_thing: Vec<String>,
    pub good_god_name: Vec<String>,
    pub bad_god_name: Vec<String>,
    pub today_level: i32,
    pub today_level_name: String,

    // Holidays
    pub legal_holidays: String,
    pub other_holidays: String,
    pub other_lunar_holidays: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn officer_tuple_of_three_yields_day_type() {
        let result = OfficerResult::Tuple {
            items: vec!["建".into(), "青龙".into(), "黄道日".into()],
        };
        assert_eq!(result.day_type(), Some("黄道日"));
    }

    #[test]
    fn officer_other_shapes_have_no_day_type() {
        let short = OfficerResult::Tuple {
            items: vec!["建".into(), "青龙".into()],
        };
        let long = OfficerResult::Tuple {
            items: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        };
        let other = OfficerResult::Other {
            repr: "None".into(),
        };
        assert_eq!(short.day_type(), None);
        assert_eq!(long.day_type(), None);
        assert_eq!(other.day_type(), None);
    }

    #[test]
    fn officer_result_decodes_tagged_json() {
        let tuple: OfficerResult =
            serde_json::from_str(r#"{"kind":"tuple","items":["除","明堂","黄道日"]}"#).unwrap();
        assert_eq!(tuple.day_type(), Some("黄道日"));

        let other: OfficerResult =
            serde_json::from_str(r#"{"kind":"other","repr":"['除']"}"#).unwrap();
        assert!(matches!(other, OfficerResult::Other { .. }));
    }
}
