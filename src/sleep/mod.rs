//! Sleep tracking.
//!
//! - Session records with derived durations
//! - The single-slot sleep/wake state machine
//! - Awake time, last session and rolling weekly averages
//! - The status view built from a snapshot of sessions

pub mod metrics;
pub mod session;
pub mod tracker;
pub mod view;

pub use metrics::{
    averages_for, current_awake_duration, is_awake_alert, last_session, recent_history,
    windowed_average, WeeklyAverages, WindowAverage, AWAKE_ALERT_HOURS, DEFAULT_HISTORY_LIMIT,
};
pub use session::{SessionRecord, SleepKind};
pub use tracker::{SleepTracker, TrackerState};
pub use view::{build_view, build_view_with_limit, MetricsView};
