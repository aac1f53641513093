//! Derived sleep metrics.
//!
//! Every function here is pure: it takes a snapshot of sessions ordered
//! most-recent-first (by end time) and the current instant, and computes a
//! value without touching storage.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::session::SessionRecord;
use crate::core::{elapsed_hours, format_hours};

/// Awake time at or beyond which the status is shown as an alert.
pub const AWAKE_ALERT_HOURS: f64 = 16.0;

/// Number of sessions shown in history by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Upper bound on the divisor used for per-night averages.
pub const MAX_AVERAGE_NIGHTS: usize = 7;

/// Trailing windows reported by [`averages_for`], in weeks.
pub const AVERAGE_WINDOWS_WEEKS: [u32; 3] = [1, 2, 3];

/// Result of a windowed average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WindowAverage {
    /// Average nightly hours.
    Hours(f64),
    /// No qualifying nights in the window.
    NoData,
}

impl WindowAverage {
    /// The average, or `None` when there was no data.
    #[must_use]
    pub const fn hours(&self) -> Option<f64> {
        match self {
            Self::Hours(h) => Some(*h),
            Self::NoData => None,
        }
    }

    /// The average, with no data shown as zero.
    #[must_use]
    pub const fn hours_or_zero(&self) -> f64 {
        match self {
            Self::Hours(h) => *h,
            Self::NoData => 0.0,
        }
    }

    /// Whether the window had no qualifying nights.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

impl std::fmt::Display for WindowAverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_hours(self.hours_or_zero()))
    }
}

/// Averages over the trailing one, two and three weeks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAverages {
    /// Last 7 days.
    pub week1: WindowAverage,
    /// Last 14 days.
    pub week2: WindowAverage,
    /// Last 21 days.
    pub week3: WindowAverage,
}

impl WeeklyAverages {
    /// Average for a window length in weeks (1, 2 or 3).
    #[must_use]
    pub const fn get(&self, weeks: u32) -> Option<WindowAverage> {
        match weeks {
            1 => Some(self.week1),
            2 => Some(self.week2),
            3 => Some(self.week3),
            _ => None,
        }
    }

    /// `(weeks, average)` pairs in ascending window order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, WindowAverage)> + '_ {
        AVERAGE_WINDOWS_WEEKS
            .into_iter()
            .filter_map(|weeks| self.get(weeks).map(|avg| (weeks, avg)))
    }
}

/// Hours since the most recent session ended, or `None` with no sessions.
#[must_use]
pub fn current_awake_duration(records: &[SessionRecord], now: DateTime<Utc>) -> Option<f64> {
    last_session(records).map(|last| elapsed_hours(last.end_time(), now))
}

/// Whether an awake duration should be flagged.
#[must_use]
pub fn is_awake_alert(awake_hours: f64) -> bool {
    awake_hours >= AWAKE_ALERT_HOURS
}

/// The session with the latest end time.
///
/// Ties on end time go to the session with the later start time.
#[must_use]
pub fn last_session(records: &[SessionRecord]) -> Option<&SessionRecord> {
    records
        .iter()
        .max_by_key(|r| (r.end_time(), r.start_time()))
}

/// Average nightly sleep over sessions ending in the last `window_days` days.
///
/// Naps are ignored. The total is divided by the number of qualifying
/// nights, capped at [`MAX_AVERAGE_NIGHTS`] whatever the window length.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn windowed_average(
    records: &[SessionRecord],
    now: DateTime<Utc>,
    window_days: u32,
) -> WindowAverage {
    let since = now - Duration::days(i64::from(window_days));

    let (total, count) = records
        .iter()
        .filter(|r| !r.is_nap() && r.end_time() >= since)
        .fold((0.0_f64, 0_usize), |(sum, n), r| {
            (sum + r.duration_hours(), n + 1)
        });

    if count == 0 {
        return WindowAverage::NoData;
    }

    WindowAverage::Hours(total / count.min(MAX_AVERAGE_NIGHTS) as f64)
}

/// Averages for the 7, 14 and 21 day windows.
#[must_use]
pub fn averages_for(records: &[SessionRecord], now: DateTime<Utc>) -> WeeklyAverages {
    WeeklyAverages {
        week1: windowed_average(records, now, 7),
        week2: windowed_average(records, now, 14),
        week3: windowed_average(records, now, 21),
    }
}

/// The first `limit` sessions, in input order.
#[must_use]
pub fn recent_history(records: &[SessionRecord], limit: usize) -> &[SessionRecord] {
    &records[..records.len().min(limit)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 22, 12, 0, 0).unwrap()
    }

    /// A session ending `days_ago` days before `now()` and lasting `hours`.
    fn ended(days_ago: i64, hours: f64, is_nap: bool) -> SessionRecord {
        let end = now() - Duration::days(days_ago);
        #[allow(clippy::cast_possible_truncation)]
        let start = end - Duration::milliseconds((hours * 3_600_000.0) as i64);
        SessionRecord::new(start, end, is_nap).unwrap()
    }

    fn assert_hours(avg: WindowAverage, expected: f64) {
        let hours = avg.hours().expect("expected data");
        assert!((hours - expected).abs() < 1e-9, "got {hours}, want {expected}");
    }

    #[test]
    fn test_awake_duration_empty() {
        assert!(current_awake_duration(&[], now()).is_none());
    }

    #[test]
    fn test_awake_duration_single() {
        let end = now() - Duration::minutes(150);
        let records = vec![SessionRecord::new(end - Duration::hours(8), end, false).unwrap()];
        let awake = current_awake_duration(&records, now()).unwrap();
        assert!((awake - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_awake_alert_threshold() {
        assert!(!is_awake_alert(15.99));
        assert!(is_awake_alert(16.0));
        assert!(is_awake_alert(20.0));
    }

    #[test]
    fn test_last_session_prefers_latest_end() {
        let records = vec![ended(1, 8.0, false), ended(0, 1.0, true), ended(2, 7.0, false)];
        let last = last_session(&records).unwrap();
        assert!(last.is_nap());
        assert!(last_session(&[]).is_none());
    }

    #[test]
    fn test_last_session_tie_goes_to_later_start() {
        let end = now() - Duration::hours(3);
        let long = SessionRecord::new(end - Duration::hours(9), end, false).unwrap();
        let short = SessionRecord::new(end - Duration::hours(2), end, true).unwrap();

        let records = vec![long.clone(), short.clone()];
        assert_eq!(last_session(&records), Some(&short));

        let records = vec![short.clone(), long];
        assert_eq!(last_session(&records), Some(&short));
    }

    #[test]
    fn test_windowed_average_no_data() {
        assert!(windowed_average(&[], now(), 7).is_no_data());

        let naps = vec![ended(1, 1.0, true), ended(2, 0.5, true)];
        assert_eq!(windowed_average(&naps, now(), 7), WindowAverage::NoData);
        assert!(windowed_average(&naps, now(), 7).hours_or_zero().abs() < f64::EPSILON);
    }

    #[test]
    fn test_windowed_average_scenario() {
        let records = vec![ended(1, 8.0, false), ended(8, 7.5, false), ended(15, 7.0, false)];

        assert_hours(windowed_average(&records, now(), 7), 8.0);
        assert_hours(windowed_average(&records, now(), 14), 7.75);
        assert_hours(windowed_average(&records, now(), 21), 7.5);
    }

    #[test]
    fn test_windowed_average_divisor_capped_at_seven() {
        // Ten nights in the last 21 days totalling 75 hours.
        let records: Vec<_> = (0..10).map(|i| ended(i * 2, 7.5, false)).collect();
        assert_hours(windowed_average(&records, now(), 21), 75.0 / 7.0);
    }

    #[test]
    fn test_windowed_average_ignores_naps() {
        let records = vec![ended(1, 8.0, false), ended(1, 1.5, true), ended(2, 6.0, false)];
        assert_hours(windowed_average(&records, now(), 7), 7.0);
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let records = vec![ended(7, 6.0, false), ended(0, 8.0, false)];
        assert_hours(windowed_average(&records, now(), 7), 7.0);
    }

    #[test]
    fn test_averages_for() {
        let records = vec![ended(1, 8.0, false), ended(8, 7.5, false), ended(15, 7.0, false)];
        let averages = averages_for(&records, now());

        assert_hours(averages.week1, 8.0);
        assert_hours(averages.week2, 7.75);
        assert_hours(averages.week3, 7.5);
        assert_eq!(averages.iter().map(|(w, _)| w).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(averages.get(4).is_none());
    }

    #[test]
    fn test_window_average_json() {
        let averages = averages_for(&[ended(1, 8.0, false)], now() + Duration::days(10));
        let value = serde_json::to_value(averages).unwrap();
        assert!(value["week1"].is_null());
        assert_eq!(value["week2"], 8.0);
    }

    #[test]
    fn test_recent_history_limit() {
        let records: Vec<_> = (0..30).map(|i| ended(i, 7.0, false)).collect();

        let recent = recent_history(&records, DEFAULT_HISTORY_LIMIT);
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0], records[0]);
        assert_eq!(recent[19], records[19]);

        assert_eq!(recent_history(&records[..3], 20).len(), 3);
        assert!(recent_history(&records, 0).is_empty());
    }
}
