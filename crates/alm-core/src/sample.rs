//! Units of work: sample times, sample keys, and year ranges.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ConfigMode;
use crate::errors::CoreError;

/// Number of records emitted for every real calendar day.
pub const SAMPLES_PER_DAY: u64 = 4;

/// Earliest year a range may start at.
pub const MIN_YEAR: i32 = 1;

/// Latest year a range may end at.
pub const MAX_YEAR: i32 = 9999;

// ---------------------------------------------------------------------------
// SampleTime
// ---------------------------------------------------------------------------

/// A time of day at minute resolution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct SampleTime {
    pub hour: u32,
    pub minute: u32,
}

impl SampleTime {
    /// The daytime sample, inside the 巳 double-hour.
    pub const MORNING: Self = Self {
        hour: 10,
        minute: 30,
    };

    /// The late sample, inside the 子 double-hour that already belongs to the
    /// next day's stem-branch.
    pub const EVENING: Self = Self {
        hour: 23,
        minute: 30,
    };

    /// # Errors
    ///
    /// Returns `CoreError::InvalidTime` when hour or minute is out of range.
    pub fn new(hour: u32, minute: u32) -> Result<Self, CoreError> {
        if hour > 23 || minute > 59 {
            return Err(CoreError::InvalidTime(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }
}

impl fmt::Display for SampleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for SampleTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour = hour.parse::<u32>().map_err(|_| invalid())?;
        let minute = minute.parse::<u32>().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

// ---------------------------------------------------------------------------
// SampleKey
// ---------------------------------------------------------------------------

/// One unit of work: a candidate calendar day, a time of day, and a mode.
///
/// The `(year, month, day)` triple is not guaranteed to be a real date. The
/// enumerator emits day 29..=31 for every month and leaves rejection to the
/// oracle adapter, which calls [`SampleKey::date_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub time: SampleTime,
    pub mode: ConfigMode,
}

impl SampleKey {
    #[must_use]
    pub const fn new(year: i32, month: u32, day: u32, time: SampleTime, mode: ConfigMode) -> Self {
        Self {
            year,
            month,
            day,
            time,
            mode,
        }
    }

    /// The calendar date, or `None` when the triple is not a real day.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// The full sampled timestamp, or `None` when the date is impossible.
    #[must_use]
    pub fn date_time(&self) -> Option<NaiveDateTime> {
        self.date()?.and_hms_opt(self.time.hour, self.time.minute, 0)
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{} {} [{}]",
            self.year, self.month, self.day, self.time, self.mode
        )
    }
}

// ---------------------------------------------------------------------------
// YearRange
// ---------------------------------------------------------------------------

/// An inclusive range of Gregorian years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// # Errors
    ///
    /// Returns `CoreError::InvalidRange` if `start > end` or either bound is
    /// outside `MIN_YEAR..=MAX_YEAR`.
    pub fn new(start: i32, end: i32) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidRange {
            start,
            end,
            reason: reason.to_string(),
        };
        if start > end {
            return Err(invalid("start year is after end year"));
        }
        if start < MIN_YEAR || end > MAX_YEAR {
            return Err(invalid("years must be within 1..=9999"));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start..=self.end
    }

    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }

    /// Number of years in the range.
    #[must_use]
    pub fn year_count(&self) -> u64 {
        u64::from(self.end.abs_diff(self.start)) + 1
    }

    /// Number of real calendar days in the range.
    #[must_use]
    pub fn day_count(&self) -> u64 {
        self.years()
            .map(|year| {
                NaiveDate::from_ymd_opt(year, 12, 31).map_or(0, |last| u64::from(last.ordinal()))
            })
            .sum()
    }

    /// Exact number of records a complete, fault-free run writes.
    #[must_use]
    pub fn expected_records(&self) -> u64 {
        self.day_count() * SAMPLES_PER_DAY
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10:30", SampleTime::MORNING)]
    #[case("23:30", SampleTime::EVENING)]
    #[case("00:00", SampleTime { hour: 0, minute: 0 })]
    fn sample_time_parses(#[case] input: &str, #[case] expected: SampleTime) {
        assert_eq!(input.parse::<SampleTime>(), Ok(expected));
        assert_eq!(expected.to_string(), input);
    }

    #[rstest]
    #[case("24:00")]
    #[case("9:30")]
    #[case("10:60")]
    #[case("1030")]
    fn sample_time_rejects(#[case] input: &str) {
        assert!(input.parse::<SampleTime>().is_err());
    }

    #[rstest]
    #[case(2023, 2, 30)]
    #[case(2021, 4, 31)]
    #[case(1900, 2, 29)]
    #[case(2023, 2, 29)]
    fn impossible_dates_have_no_date_time(#[case] y: i32, #[case] m: u32, #[case] d: u32) {
        let key = SampleKey::new(y, m, d, SampleTime::MORNING, ConfigMode::Duty);
        assert!(key.date().is_none());
        assert!(key.date_time().is_none());
    }

    #[test]
    fn leap_day_is_real() {
        let key = SampleKey::new(2024, 2, 29, SampleTime::EVENING, ConfigMode::NoDuty);
        let at = key.date_time().unwrap();
        assert_eq!(at.format("%Y-%m-%d %H:%M").to_string(), "2024-02-29 23:30");
    }

    #[test]
    fn sample_key_display_names_mode() {
        let key = SampleKey::new(1901, 1, 5, SampleTime::MORNING, ConfigMode::NoDuty);
        assert_eq!(key.to_string(), "1901-1-5 10:30 [noduty]");
    }

    #[test]
    fn year_range_validates_bounds() {
        assert!(YearRange::new(2000, 1999).is_err());
        assert!(YearRange::new(0, 10).is_err());
        assert!(YearRange::new(1, 10_000).is_err());
        assert!(YearRange::new(1901, 2099).is_ok());
    }

    #[test]
    fn year_range_counts_days_including_leap_years() {
        assert_eq!(YearRange::new(2023, 2023).unwrap().day_count(), 365);
        assert_eq!(YearRange::new(2024, 2024).unwrap().day_count(), 366);
        assert_eq!(YearRange::new(2000, 2000).unwrap().day_count(), 366);
        assert_eq!(YearRange::new(1900, 1900).unwrap().day_count(), 365);
        assert_eq!(YearRange::new(2023, 2024).unwrap().expected_records(), 731 * 4);
    }

    #[test]
    fn default_range_expected_records() {
        // 1901..=2099 has 199 years, 49 of them leap (2000 included).
        let range = YearRange::new(1901, 2099).unwrap();
        assert_eq!(range.year_count(), 199);
        assert_eq!(range.day_count(), 199 * 365 + 49);
        assert_eq!(range.expected_records(), (199 * 365 + 49) * 4);
    }
}
