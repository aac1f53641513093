//! JSON output formatting for sleeplog.

use serde::Serialize;
use serde_json::json;

use crate::error::SleeplogError;
use crate::sleep::{MetricsView, SessionRecord, TrackerState};

#[derive(Serialize)]
struct StatusJson<'a> {
    tracker: TrackerState,
    #[serde(flatten)]
    view: &'a MetricsView,
}

/// Format the status view as JSON, with the tracker slot alongside it.
///
/// # Errors
///
/// Returns `SleeplogError::Parse` if JSON serialization fails.
pub fn format_status_json(view: &MetricsView, tracker: TrackerState) -> Result<String, SleeplogError> {
    to_json(&StatusJson { tracker, view })
}

/// Format sessions as JSON
///
/// # Errors
///
/// Returns `SleeplogError::Parse` if JSON serialization fails.
pub fn format_history_json(sessions: &[SessionRecord]) -> Result<String, SleeplogError> {
    let output = json!({
        "count": sessions.len(),
        "items": sessions
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `SleeplogError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, SleeplogError> {
    Ok(serde_json::to_string_pretty(value)?)
}
