//! Time arithmetic and parsing helpers.
//!
//! Durations are handled as fractional hours throughout the sleep model;
//! these helpers convert between hours, `chrono` types and user input.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Convert a `chrono::Duration` to fractional hours.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn duration_to_hours(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Hours elapsed between two instants.
///
/// Negative when `to` is before `from`; the result is not clamped.
#[must_use]
pub fn elapsed_hours(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    duration_to_hours(to.signed_duration_since(from))
}

/// Split fractional hours into whole hours and whole minutes.
///
/// Both parts are floored, so `7.999` is `(7, 59)`. Callers only pass
/// non-negative values.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn split_hours(hours: f64) -> (i64, i64) {
    debug_assert!(hours >= 0.0, "split_hours called with negative value {hours}");
    let whole = hours.floor() as i64;
    let minutes = ((hours % 1.0) * 60.0).floor() as i64;
    (whole, minutes)
}

/// Format fractional hours as `"Xh Ym"`.
#[must_use]
pub fn format_hours(hours: f64) -> String {
    let (h, m) = split_hours(hours.max(0.0));
    format!("{h}h {m}m")
}

/// Parse a duration string like "45m", "1h30m", "90s".
///
/// A bare number is read as minutes. Returns `None` for empty, zero,
/// malformed or out-of-range input.
#[must_use]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    if let Ok(minutes) = s.parse::<i64>() {
        return if minutes > 0 {
            Duration::try_minutes(minutes)
        } else {
            None
        };
    }

    let mut total_seconds: i64 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let num: i64 = current_num.parse().ok()?;
            current_num.clear();

            let unit = match c {
                'h' => 3600,
                'm' => 60,
                's' => 1,
                _ => return None,
            };
            total_seconds = total_seconds.checked_add(num.checked_mul(unit)?)?;
        }
    }

    if !current_num.is_empty() {
        let num: i64 = current_num.parse().ok()?;
        total_seconds = total_seconds.checked_add(num.checked_mul(60)?)?;
    }

    if total_seconds > 0 {
        Duration::try_seconds(total_seconds)
    } else {
        None
    }
}

/// Parse a point in time entered on the command line.
///
/// Supported forms:
/// - `now`
/// - RFC 3339 (`2024-03-01T23:15:00Z`)
/// - `2024-03-01 23:15`, `2024-03-01 23:15:30`, `2024-03-01T23:15`
/// - `today 23:15`, `yesterday 11pm`
/// - a bare time (`07:30`, `7am`, `6:45pm`), meaning today
///
/// Inputs without an offset are read in the local timezone.
#[must_use]
pub fn parse_instant(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let input = input.trim();
    let lower = input.to_lowercase();

    if lower == "now" {
        return Some(now);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return local_to_utc(naive);
        }
    }

    let today = now.with_timezone(&Local).date_naive();
    let (day, time_part) = split_day_prefix(&lower, today);
    let time = parse_time(time_part)?;
    local_to_utc(NaiveDateTime::new(day, time))
}

/// Strip a leading `today`/`yesterday` and resolve it against `today`.
fn split_day_prefix(input: &str, today: NaiveDate) -> (NaiveDate, &str) {
    if let Some(rest) = input.strip_prefix("yesterday") {
        let day = today.pred_opt().unwrap_or(today);
        (day, rest.trim_start_matches([' ', '@']).trim_start_matches("at ").trim())
    } else if let Some(rest) = input.strip_prefix("today") {
        (today, rest.trim_start_matches([' ', '@']).trim_start_matches("at ").trim())
    } else {
        (today, input)
    }
}

fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a time of day: `15:00`, `3pm`, `3:30pm`, `12am`.
fn parse_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim();

    if let Ok(time) = NaiveTime::parse_from_str(input, "%H:%M") {
        return Some(time);
    }

    let (time_str, is_pm) = if let Some(rest) = input.strip_suffix("pm") {
        (rest.trim(), true)
    } else if let Some(rest) = input.strip_suffix("am") {
        (rest.trim(), false)
    } else {
        return None;
    };

    let (hour_str, minute_str) = time_str.split_once(':').unwrap_or((time_str, "0"));
    let mut hour: u32 = hour_str.parse().ok()?;
    let minute: u32 = minute_str.parse().ok()?;

    if hour == 0 || hour > 12 {
        return None;
    }
    if is_pm && hour < 12 {
        hour += 12;
    } else if !is_pm && hour == 12 {
        hour = 0;
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}
