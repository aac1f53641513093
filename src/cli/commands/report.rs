//! Read-only commands: status, history, and averages.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::cli::args::{HistoryArgs, OutputFormat};
use crate::error::SleeplogError;
use crate::output::{format_averages, format_history, format_status};
use crate::sleep::{averages_for, build_view_with_limit, recent_history, TrackerState};
use crate::storage::SessionStore;

/// Longest window any average looks at.
const AVERAGE_LOOKBACK_DAYS: i64 = 21;

/// Show awake time, last sleep, averages, and recent history.
///
/// # Errors
///
/// Returns an error if the sessions cannot be read or output formatting fails.
pub fn status<S: SessionStore>(
    store: &S,
    tracker: TrackerState,
    now: DateTime<Utc>,
    history_limit: usize,
    format: OutputFormat,
) -> Result<String, SleeplogError> {
    let records = store.query_all()?;
    debug!(count = records.len(), "building status view");

    let view = build_view_with_limit(&records, now, history_limit);
    format_status(&view, tracker, format)
}

/// List recent sessions.
///
/// # Errors
///
/// Returns an error if the sessions cannot be read or output formatting fails.
pub fn history<S: SessionStore>(
    store: &S,
    args: &HistoryArgs,
    default_limit: usize,
    format: OutputFormat,
) -> Result<String, SleeplogError> {
    let records = store.query_all()?;
    let limit = args.limit.unwrap_or(default_limit);
    format_history(recent_history(&records, limit), format)
}

/// Show the 1/2/3-week averages.
///
/// # Errors
///
/// Returns an error if the sessions cannot be read or output formatting fails.
pub fn averages<S: SessionStore>(
    store: &S,
    now: DateTime<Utc>,
    format: OutputFormat,
) -> Result<String, SleeplogError> {
    let since = now - Duration::days(AVERAGE_LOOKBACK_DAYS);
    let records = store.query_by_window(since)?;
    format_averages(&averages_for(&records, now), format)
}
