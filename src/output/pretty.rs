use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::core::{format_hours, split_hours};
use crate::sleep::{
    MetricsView, SessionRecord, SleepKind, SleepTracker, TrackerState, WeeklyAverages,
};

/// Format the status screen.
pub fn format_status_pretty(view: &MetricsView, tracker: TrackerState) -> String {
    let mut lines = Vec::new();

    lines.push("Sleep Status".bold().to_string());
    lines.push("─".repeat(40));

    let tracker = SleepTracker::from_state(tracker);
    match (tracker.sleeping_since(), tracker.asleep_hours(view.generated_at)) {
        (Some(start_time), Some(asleep)) => lines.push(format!(
            "{} since {} ({} so far)",
            "Sleeping".blue().bold(),
            start_time.with_timezone(&chrono::Local).format("%H:%M"),
            format_hours(asleep)
        )),
        _ => lines.push(format_awake_line(view)),
    }

    lines.push(format_last_sleep_line(view.last_session.as_ref()));
    lines.push(String::new());
    lines.push(format_averages_pretty(&view.weekly_averages));

    if !view.recent_history.is_empty() {
        lines.push(String::new());
        lines.push(format_history_pretty(&view.recent_history));
    }

    lines.join("\n")
}

fn format_awake_line(view: &MetricsView) -> String {
    let Some(hours) = view.awake_hours else {
        return "Awake for: Not enough data".to_string();
    };

    let (h, m) = split_hours(hours.max(0.0));
    let line = format!("Awake for: {h} hours {m} minutes");

    if view.awake_alert {
        line.red().bold().to_string()
    } else {
        line
    }
}

fn format_last_sleep_line(last: Option<&SessionRecord>) -> String {
    last.map_or_else(
        || "Last sleep: Not recorded yet".to_string(),
        |session| {
            format!(
                "Last sleep: {} ({})",
                format_hours(session.duration_hours()),
                session.kind()
            )
        },
    )
}

/// Format the 1/2/3-week averages, one per line.
pub fn format_averages_pretty(averages: &WeeklyAverages) -> String {
    averages
        .iter()
        .map(|(weeks, avg)| {
            let value = if avg.is_no_data() {
                avg.to_string().dimmed().to_string()
            } else {
                avg.to_string()
            };
            format!("{weeks}-week average: {value} per night")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format sessions as a table, newest first.
pub fn format_history_pretty(sessions: &[SessionRecord]) -> String {
    if sessions.is_empty() {
        return "No sleep recorded yet.\n\nStart one with: sleeplog sleep".to_string();
    }

    let mut lines = Vec::new();
    lines.push(format!("Sleep History ({} sessions)", sessions.len()).bold().to_string());
    lines.push("─".repeat(52));
    lines.push(format!(
        "{:<12} {:<7} {:<7} {:<10} {}",
        "Date", "Start", "End", "Duration", "Type"
    ));

    for session in sessions {
        let start = session.start_time_local();
        let kind = match session.kind() {
            SleepKind::Night => SleepKind::Night.short_name().normal(),
            SleepKind::Nap => SleepKind::Nap.short_name().cyan(),
        };

        lines.push(format!(
            "{:<12} {:<7} {:<7} {:<10} {}",
            start.format("%Y-%m-%d"),
            start.format("%H:%M"),
            session.end_time_local().format("%H:%M"),
            format_hours(session.duration_hours()),
            kind
        ));
    }

    lines.join("\n")
}

/// Format a single recorded session.
pub fn format_session_pretty(session: &SessionRecord, heading: &str) -> String {
    let mut lines = vec![heading.green().to_string()];
    lines.push(format!(
        "   {} → {}",
        session.start_time_local().format("%Y-%m-%d %H:%M"),
        session.end_time_local().format("%Y-%m-%d %H:%M")
    ));
    lines.push(format!(
        "   Duration: {} ({})",
        format_hours(session.duration_hours()),
        session.kind()
    ));
    lines.join("\n")
}

/// Format confirmation of a started sleep.
pub fn format_sleep_started_pretty(start: DateTime<Utc>) -> String {
    let mut lines = vec![format!(
        "Sleep started at {}",
        start.with_timezone(&chrono::Local).format("%H:%M")
    )
    .green()
    .to_string()];
    lines.push(String::new());
    lines.push("   Use 'sleeplog wake' when you get up".dimmed().to_string());
    lines.join("\n")
}
