//! Sleep tracker state machine.
//!
//! Holds at most one open sleep interval. `begin_sleep` opens it,
//! `end_sleep` closes it and hands back the finished [`SessionRecord`] for
//! the caller to persist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::session::SessionRecord;
use crate::core::elapsed_hours;
use crate::error::SleeplogError;

/// Current state of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum TrackerState {
    /// No sleep is open.
    #[default]
    Idle,
    /// A sleep started at `start_time` and has not ended yet.
    #[serde(rename_all = "camelCase")]
    InProgress {
        /// When the open sleep began.
        start_time: DateTime<Utc>,
    },
}

impl std::fmt::Display for TrackerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Awake"),
            Self::InProgress { .. } => write!(f, "Sleeping"),
        }
    }
}

/// Single-slot sleep tracker.
#[derive(Debug, Clone, Default)]
pub struct SleepTracker {
    state: TrackerState,
}

impl SleepTracker {
    /// Create an idle tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TrackerState::Idle,
        }
    }

    /// Restore a tracker from a previously saved state.
    #[must_use]
    pub const fn from_state(state: TrackerState) -> Self {
        Self { state }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> TrackerState {
        self.state
    }

    /// Whether a sleep is open.
    #[must_use]
    pub const fn is_sleeping(&self) -> bool {
        matches!(self.state, TrackerState::InProgress { .. })
    }

    /// Start of the open sleep, if any.
    #[must_use]
    pub const fn sleeping_since(&self) -> Option<DateTime<Utc>> {
        match self.state {
            TrackerState::Idle => None,
            TrackerState::InProgress { start_time } => Some(start_time),
        }
    }

    /// Hours slept so far in the open sleep.
    #[must_use]
    pub fn asleep_hours(&self, now: DateTime<Utc>) -> Option<f64> {
        self.sleeping_since().map(|start| elapsed_hours(start, now))
    }

    /// Open a sleep interval at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SleeplogError::AlreadySleeping`] if a sleep is already open.
    /// The existing start time is left untouched.
    pub fn begin_sleep(&mut self, now: DateTime<Utc>) -> Result<(), SleeplogError> {
        if let TrackerState::InProgress { start_time } = self.state {
            return Err(SleeplogError::AlreadySleeping { since: start_time });
        }

        debug!(start = %now, "sleep started");
        self.state = TrackerState::InProgress { start_time: now };
        Ok(())
    }

    /// Close the open sleep at `now` and return the finished session.
    ///
    /// # Errors
    ///
    /// Returns [`SleeplogError::NotSleeping`] when idle, or
    /// [`SleeplogError::InvalidInterval`] when `now` is not after the start.
    /// On error the state is unchanged.
    pub fn end_sleep(
        &mut self,
        now: DateTime<Utc>,
        is_nap: bool,
    ) -> Result<SessionRecord, SleeplogError> {
        let TrackerState::InProgress { start_time } = self.state else {
            return Err(SleeplogError::NotSleeping);
        };

        let record = SessionRecord::new(start_time, now, is_nap)?;
        self.state = TrackerState::Idle;

        debug!(
            start = %start_time,
            end = %now,
            hours = record.duration_hours(),
            is_nap,
            "sleep ended"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn night() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap()
    }

    #[test]
    fn test_new_tracker_is_idle() {
        let tracker = SleepTracker::new();
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert!(!tracker.is_sleeping());
        assert!(tracker.sleeping_since().is_none());
    }

    #[test]
    fn test_begin_then_end() {
        let mut tracker = SleepTracker::new();
        tracker.begin_sleep(night()).unwrap();
        assert_eq!(
            tracker.state(),
            TrackerState::InProgress { start_time: night() }
        );

        let wake = night() + Duration::hours(8);
        let record = tracker.end_sleep(wake, false).unwrap();

        assert_eq!(record.start_time(), night());
        assert_eq!(record.end_time(), wake);
        assert!(!record.is_nap());
        assert!((record.duration_hours() - 8.0).abs() < 1e-9);
        assert_eq!(tracker.state(), TrackerState::Idle);
    }

    #[test]
    fn test_double_begin_keeps_first_start() {
        let mut tracker = SleepTracker::new();
        tracker.begin_sleep(night()).unwrap();

        let err = tracker
            .begin_sleep(night() + Duration::hours(1))
            .unwrap_err();
        assert!(matches!(err, SleeplogError::AlreadySleeping { since } if since == night()));
        assert_eq!(tracker.sleeping_since(), Some(night()));
    }

    #[test]
    fn test_end_while_idle() {
        let mut tracker = SleepTracker::new();
        assert!(matches!(
            tracker.end_sleep(night(), false),
            Err(SleeplogError::NotSleeping)
        ));
    }

    #[test]
    fn test_end_before_start_keeps_sleeping() {
        let mut tracker = SleepTracker::new();
        tracker.begin_sleep(night()).unwrap();

        let err = tracker.end_sleep(night(), false).unwrap_err();
        assert!(matches!(err, SleeplogError::InvalidInterval { .. }));
        assert!(tracker.is_sleeping());
    }

    #[test]
    fn test_second_end_fails() {
        let mut tracker = SleepTracker::new();
        tracker.begin_sleep(night()).unwrap();
        tracker.end_sleep(night() + Duration::hours(7), false).unwrap();

        assert!(matches!(
            tracker.end_sleep(night() + Duration::hours(8), false),
            Err(SleeplogError::NotSleeping)
        ));
    }

    #[test]
    fn test_asleep_hours() {
        let tracker = SleepTracker::from_state(TrackerState::InProgress { start_time: night() });
        let hours = tracker.asleep_hours(night() + Duration::minutes(90)).unwrap();
        assert!((hours - 1.5).abs() < 1e-9);
        assert!(SleepTracker::new().asleep_hours(night()).is_none());
    }
}
