//! Output formatting for sleeplog.
//!
//! Every command renders through here so that `--output json` and the
//! colored terminal view stay in sync.

mod json;
mod pretty;

use chrono::{DateTime, Utc};

use crate::cli::args::OutputFormat;
use crate::error::SleeplogError;
use crate::sleep::{MetricsView, SessionRecord, TrackerState, WeeklyAverages};

pub use json::*;
pub use pretty::*;

/// Format the status view based on output format
///
/// # Errors
///
/// Returns `SleeplogError::Parse` if JSON serialization fails.
pub fn format_status(
    view: &MetricsView,
    tracker: TrackerState,
    format: OutputFormat,
) -> Result<String, SleeplogError> {
    match format {
        OutputFormat::Pretty => Ok(format_status_pretty(view, tracker)),
        OutputFormat::Json => format_status_json(view, tracker),
    }
}

/// Format session history based on output format
///
/// # Errors
///
/// Returns `SleeplogError::Parse` if JSON serialization fails.
pub fn format_history(
    sessions: &[SessionRecord],
    format: OutputFormat,
) -> Result<String, SleeplogError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(sessions)),
        OutputFormat::Json => format_history_json(sessions),
    }
}

/// Format weekly averages based on output format
///
/// # Errors
///
/// Returns `SleeplogError::Parse` if JSON serialization fails.
pub fn format_averages(
    averages: &WeeklyAverages,
    format: OutputFormat,
) -> Result<String, SleeplogError> {
    match format {
        OutputFormat::Pretty => Ok(format_averages_pretty(averages)),
        OutputFormat::Json => to_json(averages),
    }
}

/// Format a single stored session based on output format
///
/// # Errors
///
/// Returns `SleeplogError::Parse` if JSON serialization fails.
pub fn format_session(
    session: &SessionRecord,
    heading: &str,
    format: OutputFormat,
) -> Result<String, SleeplogError> {
    match format {
        OutputFormat::Pretty => Ok(format_session_pretty(session, heading)),
        OutputFormat::Json => to_json(session),
    }
}

/// Format the tracker state after a sleep was started
///
/// # Errors
///
/// Returns `SleeplogError::Parse` if JSON serialization fails.
pub fn format_sleep_started(
    state: TrackerState,
    start: DateTime<Utc>,
    format: OutputFormat,
) -> Result<String, SleeplogError> {
    match format {
        OutputFormat::Pretty => Ok(format_sleep_started_pretty(start)),
        OutputFormat::Json => to_json(&state),
    }
}
