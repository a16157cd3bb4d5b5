//! Candidate sample enumeration.
//!
//! Days 1..=31 are produced for every month. Impossible days are rejected by
//! the oracle adapter, never filtered here.

use alm_core::enums::ConfigMode;
use alm_core::sample::{SAMPLES_PER_DAY, SampleKey, SampleTime, YearRange};

/// The four samples taken for each day, in output order.
pub const DAY_SAMPLES: [(SampleTime, ConfigMode); 4] = [
    (SampleTime::MORNING, ConfigMode::NoDuty),
    (SampleTime::MORNING, ConfigMode::Duty),
    (SampleTime::EVENING, ConfigMode::Duty),
    (SampleTime::EVENING, ConfigMode::NoDuty),
];

/// The four sample keys of one candidate day.
pub fn day_samples(year: i32, month: u32, day: u32) -> impl Iterator<Item = SampleKey> {
    DAY_SAMPLES
        .into_iter()
        .map(move |(time, mode)| SampleKey::new(year, month, day, time, mode))
}

/// Every candidate sample of one year: 12 months x 31 days x 4.
pub fn year_samples(year: i32) -> impl Iterator<Item = SampleKey> {
    (1..=12).flat_map(move |month| (1..=31).flat_map(move |day| day_samples(year, month, day)))
}

/// Every candidate sample of a range, years ascending.
pub fn samples(range: YearRange) -> impl Iterator<Item = SampleKey> {
    range.years().flat_map(year_samples)
}

/// Number of keys [`samples`] yields, impossible dates included.
#[must_use]
pub fn candidate_count(range: YearRange) -> u64 {
    range.year_count() * 12 * 31 * SAMPLES_PER_DAY
}
