//! Deterministic in-memory oracle for tests.

use std::collections::HashSet;

use alm_core::enums::ConfigMode;
use alm_core::snapshot::{OfficerResult, OracleSnapshot};
use chrono::{Datelike, NaiveDate, Timelike};

use crate::error::OracleError;
use crate::{Oracle, OracleRequest};

/// An [`Oracle`] that synthesizes snapshots from the request alone.
///
/// Auspice lists come back unsorted and with a duplicate, like the engine's
/// set-backed attributes, so normalization is observable.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    failing: HashSet<NaiveDate>,
    disconnect: HashSet<NaiveDate>,
    calls: Vec<OracleRequest>,
}

impl ScriptedOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a computation error for every sample on `date`.
    #[must_use]
    pub fn fail_on(mut self, date: NaiveDate) -> Self {
        self.failing.insert(date);
        self
    }

    /// Behave like a dead engine process for every sample on `date`.
    #[must_use]
    pub fn disconnect_on(mut self, date: NaiveDate) -> Self {
        self.disconnect.insert(date);
        self
    }

    /// Every request answered or refused so far, in call order.
    #[must_use]
    pub fn calls(&self) -> &[OracleRequest] {
        &self.calls
    }

    /// The snapshot this oracle answers `request` with.
    #[must_use]
    pub fn snapshot_for(request: &OracleRequest) -> OracleSnapshot {
        let date = request.at.date();
        let (year, month, day) = (date.year(), date.month(), date.day());
        let hour = request.at.hour();
        let duty = request.key.mode == ConfigMode::Duty;
        let strings = |items: &[&str]| items.iter().map(ToString::to_string).collect::<Vec<_>>();

        let mut good_god_name = strings(&["月德", "天恩", "母仓"]);
        if duty {
            good_god_name.push("岁德".into());
        }

        OracleSnapshot {
            lunar_year: if month < 2 { year - 1 } else { year },
            lunar_month: i32::try_from((month + 10) % 12 + 1).unwrap_or(1),
            lunar_day: i32::try_from(day).unwrap_or(1),
            is_lunar_leap_month: false,
            lunar_year_cn: format!("Y{year}"),
            lunar_month_cn: format!("M{month}"),
            lunar_day_cn: format!("D{day}"),
            week_day_cn: date.weekday().to_string(),
            lunar_season: "孟春".into(),
            lunar_season_name: "立春".into(),
            lunar_month_type: "大".into(),
            chinese_year_zodiac: "龙".into(),
            year8_char: format!("Y8-{year}"),
            month8_char: format!("M8-{month}"),
            day8_char: format!("D8-{}", date.ordinal()),
            twohour8_char: format!("H8-{hour}"),
            year_earth_num: year.rem_euclid(12),
            month_earth_num: i32::try_from(month % 12).unwrap_or(0),
            day_earth_num: i32::try_from(date.ordinal() % 12).unwrap_or(0),
            today_solar_terms: "无".into(),
            next_solar_term: "雨水".into(),
            next_solar_term_date: (2, 9),
            next_solar_term_year: year,
            this_year_solar_terms: vec![
                ("小寒".into(), (1, 6)),
                ("冬至".into(), (12, 22)),
                ("立春".into(), (2, 4)),
            ],
            day_officer: OfficerResult::Tuple {
                items: strings(&["建", "青龙", "黄道日"]),
            },
            today12_day_officer: "建".into(),
            today12_day_god: "青龙".into(),
            day_name: "黑道日".into(),
            today28_star: "角".into(),
            the9_fly_star: "123456789".into(),
            star_zodiac: "水瓶座".into(),
            today_east_zodiac: "玄枵".into(),
            chinese_zodiac_clash: "狗日冲龙".into(),
            zodiac_mark3_list: strings(&["虎", "马"]),
            zodiac_mark6: "兔".into(),
            today5_elements: strings(&["天干", "戊", "属土"]),
            nayin: "平地木".into(),
            peng_taboo_full: "戊不受田田主不祥 戌不吃犬作怪上床".into(),
            peng_taboo_short: "戊不受田<br>戌不吃犬".into(),
            twohour8_char_list: strings(&["壬子", "癸丑", "甲寅"]),
            twohour_lucky_list: strings(&["吉", "凶", "吉"]),
            meridians: "脾".into(),
            lucky_gods_direction: strings(&["财神正北", "喜神东南", "福神西南"]),
            fetal_god: "仓库栖外东南".into(),
            good_thing: strings(&["祭祀", "嫁娶", "祭祀", "出行"]),
            bad_thing: strings(&["动土", "安葬"]),
            good_god_name,
            bad_god_name: strings(&["月建", "小时", "月建"]),
            today_level: 2,
            today_level_name: "平".into(),
            legal_holidays: String::new(),
            other_holidays: String::new(),
            other_lunar_holidays: String::new(),
        }
    }
}

impl Oracle for ScriptedOracle {
    fn query(&mut self, request: &OracleRequest) -> Result<OracleSnapshot, OracleError> {
        self.calls.push(request.clone());
        let date = request.at.date();
        if self.disconnect.contains(&date) {
            return Err(OracleError::Exited {
                stderr: "scripted disconnect".into(),
            });
        }
        if self.failing.contains(&date) {
            return Err(OracleError::Computation {
                kind: "IndexError".into(),
                message: format!("scripted failure on {date}"),
            });
        }
        Ok(Self::snapshot_for(request))
    }
}
