//! Engine snapshot to canonical record.
//!
//! Pure mapping: no recomputation, only ordering, the day-type fallback, and
//! string formatting.

use std::collections::BTreeSet;

use alm_core::record::{
    Bazi, Deities, FiveElements, GodNames, Holidays, LunarDate, PengTaboo, Record, SolarTermDate,
    SolarTermTable, SolarTerms, TwoHour, ZodiacClash,
};
use alm_core::snapshot::{OracleSnapshot, SolarTermEntry};
use alm_oracle::Observation;

/// Timestamp layout of `Record::input_date`.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Build the record for one observation.
#[must_use]
pub fn normalize(observation: &Observation) -> Record {
    let request = &observation.request;
    let s = &observation.snapshot;

    Record {
        input_date: request.at.format(INPUT_DATE_FORMAT).to_string(),
        yeargod: request.key.mode,
        lunar: LunarDate {
            year: s.lunar_year,
            month: s.lunar_month,
            day: s.lunar_day,
            is_leap: s.is_lunar_leap_month,
            year_cn: s.lunar_year_cn.clone(),
            month_cn: s.lunar_month_cn.clone(),
            day_cn: s.lunar_day_cn.clone(),
            week_day: s.week_day_cn.clone(),
            season: s.lunar_season.clone(),
            season_name: s.lunar_season_name.clone(),
            month_type: s.lunar_month_type.clone(),
            zodiac_year: s.chinese_year_zodiac.clone(),
        },
        bazi: Bazi {
            year: s.year8_char.clone(),
            month: s.month8_char.clone(),
            day: s.day8_char.clone(),
            hour: s.twohour8_char.clone(),
            year_num: s.year_earth_num,
            month_num: s.month_earth_num,
            day_num: s.day_earth_num,
        },
        solar_terms: SolarTerms {
            today: s.today_solar_terms.clone(),
            next_name: s.next_solar_term.clone(),
            next_date: month_day(s.next_solar_term_date),
            next_year: s.next_solar_term_year,
            this_year_table: term_table(&s.this_year_solar_terms),
        },
        deities: Deities {
            officer12: s.today12_day_officer.clone(),
            god12: s.today12_day_god.clone(),
            day_type: day_type(s),
            star28: s.today28_star.clone(),
            fly9: s.the9_fly_star.clone(),
            star_zodiac: s.star_zodiac.clone(),
            east_zodiac: s.today_east_zodiac.clone(),
        },
        clash: ZodiacClash {
            desc: s.chinese_zodiac_clash.clone(),
            mark3: s.zodiac_mark3_list.clone(),
            mark6: s.zodiac_mark6.clone(),
        },
        five_elements: FiveElements {
            full_desc: s.today5_elements.clone(),
            nayin: s.nayin.clone(),
        },
        peng_taboo: PengTaboo {
            full: s.peng_taboo_full.clone(),
            short: s.peng_taboo_short.clone(),
        },
        two_hour: TwoHour {
            list: s.twohour8_char_list.clone(),
            lucky: s.twohour_lucky_list.clone(),
            meridians: s.meridians.clone(),
        },
        directions: s.lucky_gods_direction.clone(),
        fetal_god: s.fetal_god.clone(),
        yi: sorted_set(&s.good_thing),
        ji: sorted_set(&s.bad_thing),
        god_names: GodNames {
            good: sorted(&s.good_god_name),
            bad: sorted(&s.bad_god_name),
        },
        thing_level: s.today_level,
        thing_level_name: s.today_level_name.clone(),
        holidays: Holidays {
            legal: s.legal_holidays.clone(),
            other: s.other_holidays.clone(),
            lunar: s.other_lunar_holidays.clone(),
        },
    }
}

/// Third element of the officer triple, or the engine's day name when the
/// officer result is not a 3-tuple.
#[must_use]
pub fn day_type(snapshot: &OracleSnapshot) -> String {
    snapshot
        .day_officer
        .day_type()
        .unwrap_or(&snapshot.day_name)
        .to_string()
}

/// `(month, day)` as `MM-DD`.
#[must_use]
pub fn month_day((month, day): (u32, u32)) -> String {
    format!("{month:02}-{day:02}")
}

/// Ascending, duplicates removed. String order is code-point order.
fn sorted_set(items: &[String]) -> Vec<String> {
    items
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Ascending, duplicates kept.
fn sorted(items: &[String]) -> Vec<String> {
    let mut items = items.to_vec();
    items.sort_unstable();
    items
}

fn term_table(entries: &[SolarTermEntry]) -> SolarTermTable {
    SolarTermTable::new(
        entries
            .iter()
            .map(|(name, (month, day))| SolarTermDate {
                name: name.clone(),
                month: *month,
                day: *day,
            })
            .collect(),
    )
}
