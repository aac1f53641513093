//! Read model for displaying sleep status.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::metrics::{
    averages_for, current_awake_duration, is_awake_alert, last_session, recent_history,
    WeeklyAverages, DEFAULT_HISTORY_LIMIT,
};
use super::session::SessionRecord;

/// Everything the status screen shows, computed from a snapshot of sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsView {
    /// Instant the view was computed for.
    pub generated_at: DateTime<Utc>,
    /// End of the most recent session.
    pub awake_since: Option<DateTime<Utc>>,
    /// Hours awake since `awake_since`.
    pub awake_hours: Option<f64>,
    /// Whether the awake time has reached the alert threshold.
    pub awake_alert: bool,
    /// Most recent session.
    pub last_session: Option<SessionRecord>,
    /// Trailing weekly averages.
    pub weekly_averages: WeeklyAverages,
    /// Most recent sessions, newest first.
    pub recent_history: Vec<SessionRecord>,
}

/// Build the view with the default history limit.
///
/// `records` must be ordered by end time, newest first.
#[must_use]
pub fn build_view(records: &[SessionRecord], now: DateTime<Utc>) -> MetricsView {
    build_view_with_limit(records, now, DEFAULT_HISTORY_LIMIT)
}

/// Build the view keeping at most `history_limit` history rows.
#[must_use]
pub fn build_view_with_limit(
    records: &[SessionRecord],
    now: DateTime<Utc>,
    history_limit: usize,
) -> MetricsView {
    let last = last_session(records);
    let awake_hours = current_awake_duration(records, now);

    MetricsView {
        generated_at: now,
        awake_since: last.map(SessionRecord::end_time),
        awake_hours,
        awake_alert: awake_hours.is_some_and(is_awake_alert),
        last_session: last.cloned(),
        weekly_averages: averages_for(records, now),
        recent_history: recent_history(records, history_limit).to_vec(),
    }
}
