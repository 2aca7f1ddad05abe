//! Synthetic forecast generation.

use chrono::{DateTime, Days, NaiveDate, TimeDelta, Utc};
use std::ops::Range;

use crate::{
    model::{ForecastDate, ForecastEntry},
    random::RandomSource,
};

/// Labels a forecast summary is drawn from, coldest first.
pub const SUMMARIES: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

/// Number of days in every forecast, starting tomorrow.
pub const FORECAST_DAYS: u64 = 5;

/// Generated Celsius temperatures are drawn from this half-open range.
pub const TEMPERATURE_RANGE: Range<i32> = -20..55;

/// Which entries carry a summary label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPolicy {
    Always,
    /// Only even day offsets (2, 4) get a label; the others leave it absent.
    EvenDaysOnly,
}

impl SummaryPolicy {
    fn applies_to(self, day: u64) -> bool {
        match self {
            SummaryPolicy::Always => true,
            SummaryPolicy::EvenDaysOnly => day % 2 == 0,
        }
    }
}

/// Forecast with one calendar date per entry, `today + 1 ..= today + 5`.
pub fn daily_forecast(
    random: &dyn RandomSource,
    today: NaiveDate,
    policy: SummaryPolicy,
) -> Vec<ForecastEntry> {
    generate(random, policy, |day| {
        // Only fails past year 262143.
        today
            .checked_add_days(Days::new(day))
            .map(ForecastDate::Day)
    })
}

/// Forecast with one UTC instant per entry, `now + 1 day ..= now + 5 days`.
pub fn timed_forecast(
    random: &dyn RandomSource,
    now: DateTime<Utc>,
    policy: SummaryPolicy,
) -> Vec<ForecastEntry> {
    generate(random, policy, |day| {
        let offset = TimeDelta::try_days(i64::try_from(day).ok()?)?;
        now.checked_add_signed(offset)
            .map(|at| ForecastDate::Instant(at.fixed_offset()))
    })
}

fn generate(
    random: &dyn RandomSource,
    policy: SummaryPolicy,
    date_for: impl Fn(u64) -> Option<ForecastDate>,
) -> Vec<ForecastEntry> {
    (1..=FORECAST_DAYS)
        .map_while(|day| {
            let date = date_for(day)?;
            let temperature_c = random.next_in(TEMPERATURE_RANGE);
            let summary = policy
                .applies_to(day)
                .then(|| SUMMARIES[random.next_index(SUMMARIES.len())].to_string());

            Some(ForecastEntry::new(date, temperature_c, summary))
        })
        .collect()
}
