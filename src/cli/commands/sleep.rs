//! Commands that change the journal: sleep, wake, nap, and log.

use chrono::{DateTime, Utc};

use crate::cli::args::{LogArgs, NapArgs, OutputFormat, SleepArgs, WakeArgs};
use crate::core::{parse_duration, parse_instant};
use crate::error::SleeplogError;
use crate::output::{format_session, format_sleep_started};
use crate::sleep::SessionRecord;
use crate::storage::SleepJournal;

/// Start a sleep.
///
/// # Errors
///
/// Returns an error if `--at` cannot be parsed, a sleep is already open,
/// or the journal cannot be written.
pub fn sleep(
    journal: &mut SleepJournal,
    args: &SleepArgs,
    now: DateTime<Utc>,
    format: OutputFormat,
) -> Result<String, SleeplogError> {
    let start = resolve_instant(args.at.as_deref(), now)?;
    let state = journal.begin_sleep(start)?;
    format_sleep_started(state, start, format)
}

/// End the open sleep and store it.
///
/// # Errors
///
/// Returns an error if `--at` cannot be parsed, no sleep is open, the end
/// is not after the start, or the journal cannot be written.
pub fn wake(
    journal: &mut SleepJournal,
    args: &WakeArgs,
    now: DateTime<Utc>,
    format: OutputFormat,
) -> Result<String, SleeplogError> {
    let end = resolve_instant(args.at.as_deref(), now)?;
    let record = journal.end_sleep(end, args.nap)?;

    let heading = if record.is_nap() {
        "Nap recorded"
    } else {
        "Good morning! Sleep recorded"
    };
    format_session(&record, heading, format)
}

/// Log a nap that has already ended.
///
/// # Errors
///
/// Returns an error if the duration or end time cannot be parsed, a sleep is
/// open, or the journal cannot be written.
pub fn nap(
    journal: &mut SleepJournal,
    args: &NapArgs,
    now: DateTime<Utc>,
    format: OutputFormat,
) -> Result<String, SleeplogError> {
    let duration = parse_duration(&args.duration).ok_or_else(|| {
        SleeplogError::InvalidInput(format!(
            "Invalid duration '{}'. Use e.g. 20m, 1h30m, or 45",
            args.duration
        ))
    })?;
    let end = resolve_instant(args.end.as_deref(), now)?;

    let record = journal.log_nap(end, duration)?;
    format_session(&record, "Nap recorded", format)
}

/// Store a session entered by hand.
///
/// # Errors
///
/// Returns an error if either time cannot be parsed, the end is not after
/// the start, or the journal cannot be written.
pub fn log(
    journal: &SleepJournal,
    args: &LogArgs,
    now: DateTime<Utc>,
    format: OutputFormat,
) -> Result<String, SleeplogError> {
    let start = resolve_instant(Some(&args.start), now)?;
    let end = resolve_instant(Some(&args.end), now)?;

    let record = journal.record(SessionRecord::new(start, end, args.nap)?)?;
    format_session(&record, "Session logged", format)
}

/// Parse an optional time argument, defaulting to `now`.
fn resolve_instant(input: Option<&str>, now: DateTime<Utc>) -> Result<DateTime<Utc>, SleeplogError> {
    let Some(input) = input else {
        return Ok(now);
    };

    parse_instant(input, now).ok_or_else(|| {
        SleeplogError::InvalidInput(format!(
            "Invalid time '{input}'. Use e.g. now, 23:30, 7am, or 2024-03-01 22:45"
        ))
    })
}
