//! Sleep session records.
//!
//! A [`SessionRecord`] is one completed sleep interval. Its duration is
//! always computed from the two instants; there is no way to construct a
//! record with a duration that disagrees with its timestamps.

use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::core::duration_to_hours;
use crate::error::SleeplogError;

/// Kind of sleep a session represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepKind {
    /// Main night sleep.
    Night,
    /// Daytime nap, excluded from averages.
    Nap,
}

impl SleepKind {
    /// Classification from the `is_nap` flag.
    #[must_use]
    pub const fn from_nap(is_nap: bool) -> Self {
        if is_nap {
            Self::Nap
        } else {
            Self::Night
        }
    }

    /// Short label for tables.
    #[must_use]
    pub const fn short_name(&self) -> &'static str {
        match self {
            Self::Night => "Night",
            Self::Nap => "Nap",
        }
    }

    /// Label used in summaries.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Night => "Night sleep",
            Self::Nap => "Nap",
        }
    }
}

impl std::fmt::Display for SleepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A completed sleep interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SessionRecordRepr", try_from = "SessionRecordRepr")]
pub struct SessionRecord {
    id: Option<i64>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    is_nap: bool,
}

impl SessionRecord {
    /// Create a session from a start/end pair.
    ///
    /// # Errors
    ///
    /// Returns [`SleeplogError::InvalidInterval`] unless `end > start`.
    pub fn new(
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        is_nap: bool,
    ) -> Result<Self, SleeplogError> {
        if end_time <= start_time {
            return Err(SleeplogError::InvalidInterval {
                start: start_time,
                end: end_time,
            });
        }

        Ok(Self {
            id: None,
            start_time,
            end_time,
            is_nap,
        })
    }

    /// Create a nap that ended at `end_time` and lasted `duration`.
    ///
    /// # Errors
    ///
    /// Returns [`SleeplogError::InvalidInterval`] if `duration` is not positive,
    /// or [`SleeplogError::InvalidInput`] if the start would fall outside the
    /// representable date range.
    pub fn nap(end_time: DateTime<Utc>, duration: Duration) -> Result<Self, SleeplogError> {
        let start_time = end_time.checked_sub_signed(duration).ok_or_else(|| {
            SleeplogError::InvalidInput(format!(
                "Nap of {} minutes is too long",
                duration.num_minutes()
            ))
        })?;
        Self::new(start_time, end_time, true)
    }

    /// Attach the storage id assigned on insert.
    #[must_use]
    pub const fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Storage id, if the record has been persisted.
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    /// When the sleep began.
    #[must_use]
    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// When the sleep ended.
    #[must_use]
    pub const fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Whether this session is a nap.
    #[must_use]
    pub const fn is_nap(&self) -> bool {
        self.is_nap
    }

    /// Night or nap.
    #[must_use]
    pub const fn kind(&self) -> SleepKind {
        SleepKind::from_nap(self.is_nap)
    }

    /// Length of the interval.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end_time.signed_duration_since(self.start_time)
    }

    /// Length of the interval in fractional hours.
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        duration_to_hours(self.duration())
    }

    /// Start time in the local timezone.
    #[must_use]
    pub fn start_time_local(&self) -> DateTime<Local> {
        self.start_time.with_timezone(&Local)
    }

    /// End time in the local timezone.
    #[must_use]
    pub fn end_time_local(&self) -> DateTime<Local> {
        self.end_time.with_timezone(&Local)
    }
}

/// Wire shape of a session.
///
/// `durationHours` is written on output and ignored on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecordRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    #[serde(default)]
    is_nap: bool,
    #[serde(default)]
    duration_hours: Option<f64>,
}

impl From<SessionRecord> for SessionRecordRepr {
    fn from(record: SessionRecord) -> Self {
        Self {
            duration_hours: Some(record.duration_hours()),
            id: record.id,
            start_time: record.start_time,
            end_time: record.end_time,
            is_nap: record.is_nap,
        }
    }
}

impl TryFrom<SessionRecordRepr> for SessionRecord {
    type Error = SleeplogError;

    fn try_from(repr: SessionRecordRepr) -> Result<Self, Self::Error> {
        let record = Self::new(repr.start_time, repr.end_time, repr.is_nap)?;
        Ok(match repr.id {
            Some(id) => record.with_id(id),
            None => record,
        })
    }
}
