//! Date and time rendering for Avro temporal logical types.
//!
//! Every function is total: inputs whose calendar date cannot be written as a
//! four-digit year saturate to fixed sentinels, and time-of-day values that
//! are not positive or exceed 99 hours render as midnight.

use chrono::{Datelike, NaiveDate};

pub const MIN_DATE: &str = "1970-01-01";
pub const MAX_DATE: &str = "3000-12-31";
pub const MIN_TIMESTAMP_MILLIS: &str = "1970-01-01 00:00:00.000";
pub const MAX_TIMESTAMP_MILLIS: &str = "3000-12-31 00:00:00.000";
pub const MIN_TIMESTAMP_MICROS: &str = "1970-01-01 00:00:00.000000";
pub const MAX_TIMESTAMP_MICROS: &str = "3000-12-31 00:00:00.000000";
pub const MIN_TIMESTAMP_UTC: &str = "1970-01-01T00:00:00.0000000Z";
pub const MAX_TIMESTAMP_UTC: &str = "3000-12-31T00:00:00.0000000Z";
pub const MIN_LOCAL_TIMESTAMP_NANOS: &str = "1970-01-01T00:00:00.0000000";
pub const MAX_LOCAL_TIMESTAMP_NANOS: &str = "3000-12-31T00:00:00.0000000";
pub const EMPTY_TIME_MILLIS: &str = "00:00:00.000";
pub const EMPTY_TIME_MICROS: &str = "00:00:00.000000";

const MILLIS_PER_SEC: i64 = 1_000;
const MICROS_PER_SEC: i64 = 1_000_000;
const NANOS_PER_SEC: i64 = 1_000_000_000;
const SECS_PER_DAY: i64 = 86_400;
const MAX_HOURS: i64 = 99;

/// `NaiveDate::from_num_days_from_ce_opt` value of 1970-01-01.
const EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Calendar date `days` after 1970-01-01, `None` outside years 0000..=9999.
fn epoch_date(days: i64) -> Option<NaiveDate> {
    let ce_days = i32::try_from(days.checked_add(EPOCH_DAYS_FROM_CE)?).ok()?;
    let date = NaiveDate::from_num_days_from_ce_opt(ce_days)?;
    (0..=9999).contains(&date.year()).then_some(date)
}

fn format_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Split an epoch offset into (date, second of day, sub-second remainder).
fn split_epoch(value: i64, per_sec: i64) -> Option<(NaiveDate, i64, i64)> {
    let secs = value.div_euclid(per_sec);
    let frac = value.rem_euclid(per_sec);
    let date = epoch_date(secs.div_euclid(SECS_PER_DAY))?;
    Some((date, secs.rem_euclid(SECS_PER_DAY), frac))
}

fn hms(second_of_day: i64) -> (i64, i64, i64) {
    (second_of_day / 3600, second_of_day % 3600 / 60, second_of_day % 60)
}

/// `YYYY-MM-DD` for days since the Unix epoch.
pub fn date_from_epoch_days(days: i32) -> String {
    match epoch_date(i64::from(days)) {
        Some(date) => format_date(date),
        None if days < 0 => MIN_DATE.to_string(),
        None => MAX_DATE.to_string(),
    }
}

fn time_of_day(value: i64, per_sec: i64, width: usize, empty: &str) -> String {
    if value <= 0 {
        return empty.to_string();
    }
    let secs = value / per_sec;
    let (hours, minutes, seconds) = (secs / 3600, secs % 3600 / 60, secs % 60);
    if hours > MAX_HOURS {
        return empty.to_string();
    }
    format!(
        "{hours:02}:{minutes:02}:{seconds:02}.{:0width$}",
        value % per_sec
    )
}

/// `HH:MM:SS.mmm` for milliseconds after midnight.
pub fn time_of_day_from_millis(millis: i32) -> String {
    time_of_day(i64::from(millis), MILLIS_PER_SEC, 3, EMPTY_TIME_MILLIS)
}

/// `HH:MM:SS.mmmmmm` for microseconds after midnight.
pub fn time_of_day_from_micros(micros: i64) -> String {
    time_of_day(micros, MICROS_PER_SEC, 6, EMPTY_TIME_MICROS)
}

fn timestamp(value: i64, per_sec: i64, width: usize, min: &str, max: &str) -> String {
    match split_epoch(value, per_sec) {
        Some((date, second_of_day, frac)) => {
            let (h, m, s) = hms(second_of_day);
            format!(
                "{} {h:02}:{m:02}:{s:02}.{frac:0width$}",
                format_date(date)
            )
        }
        None if value < 0 => min.to_string(),
        None => max.to_string(),
    }
}

/// `YYYY-MM-DD HH:MM:SS.mmm` (UTC) for milliseconds since the epoch.
pub fn timestamp_from_millis(millis: i64) -> String {
    timestamp(millis, MILLIS_PER_SEC, 3, MIN_TIMESTAMP_MILLIS, MAX_TIMESTAMP_MILLIS)
}

/// `YYYY-MM-DD HH:MM:SS.mmmmmm` (UTC) for microseconds since the epoch.
pub fn timestamp_from_micros(micros: i64) -> String {
    timestamp(micros, MICROS_PER_SEC, 6, MIN_TIMESTAMP_MICROS, MAX_TIMESTAMP_MICROS)
}

fn nanos_iso(nanos: i64, zone: &str, min: &str, max: &str) -> String {
    match split_epoch(nanos, NANOS_PER_SEC) {
        Some((date, second_of_day, frac)) => {
            let (h, m, s) = hms(second_of_day);
            format!(
                "{}T{h:02}:{m:02}:{s:02}.{:07}{zone}",
                format_date(date),
                frac / 100
            )
        }
        None if nanos < 0 => min.to_string(),
        None => max.to_string(),
    }
}

/// ISO-8601 UTC instant with 7 fractional digits (100ns ticks),
/// `YYYY-MM-DDTHH:MM:SS.fffffffZ`.
pub fn timestamp_from_nanos_utc(nanos: i64) -> String {
    nanos_iso(nanos, "Z", MIN_TIMESTAMP_UTC, MAX_TIMESTAMP_UTC)
}

/// Same as [`timestamp_from_nanos_utc`] without the zone designator.
pub fn local_timestamp_from_nanos(nanos: i64) -> String {
    nanos_iso(nanos, "", MIN_LOCAL_TIMESTAMP_NANOS, MAX_LOCAL_TIMESTAMP_NANOS)
}
