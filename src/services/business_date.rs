// src/services/business_date.rs
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

/// How the reporting delay interacts with the weekend rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateMode {
    /// Roll back off the weekend once, then subtract the delay. The result
    /// can land on a Saturday or Sunday when the delay is not a multiple of 7.
    #[default]
    Compatible,
    /// Same as `Compatible`, then roll back off the weekend again.
    Strict,
}

/// Most recent weekday at or before `date`.
fn roll_back_weekend(date: NaiveDate) -> Option<NaiveDate> {
    let back = match date.weekday() {
        Weekday::Sun => 2,
        Weekday::Sat => 1,
        _ => 0,
    };
    date.checked_sub_days(Days::new(back))
}

/// Date whose daily quotes should be requested when running on `today`.
/// Holidays are not modelled. `None` when the delay reaches past the
/// earliest representable date.
pub fn resolve_latest_business_date(today: NaiveDate, delay_days: u32, mode: DateMode) -> Option<NaiveDate> {
    // 1. Latest weekday at or before today
    let weekday = roll_back_weekend(today)?;

    // 2. Plan reporting lag, in calendar days
    let delayed = weekday.checked_sub_days(Days::new(u64::from(delay_days)))?;

    // 3. Strict mode may need a second weekend rollback
    match mode {
        DateMode::Compatible => Some(delayed),
        DateMode::Strict => roll_back_weekend(delayed),
    }
}

/// Calendar date of `now` in `timezone`, or in the host's local zone.
pub fn calendar_date(now: DateTime<Utc>, timezone: Option<Tz>) -> NaiveDate {
    match timezone {
        Some(tz) => now.with_timezone(&tz).date_naive(),
        None => now.with_timezone(&Local).date_naive(),
    }
}
