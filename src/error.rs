//! Error types for sleeplog.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors produced by the tracker, the journal, and the CLI.
#[derive(Debug, Error)]
pub enum SleeplogError {
    /// A session's end is not strictly after its start.
    #[error("invalid interval: end {end} is not after start {start}")]
    InvalidInterval {
        /// Interval start.
        start: DateTime<Utc>,
        /// Interval end.
        end: DateTime<Utc>,
    },

    /// A sleep was started while another one is still open.
    #[error("already sleeping since {since}")]
    AlreadySleeping {
        /// Start of the open sleep.
        since: DateTime<Utc>,
    },

    /// A sleep was ended while none is open.
    #[error("not sleeping: no sleep has been started")]
    NotSleeping,

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Configuration could not be loaded or saved.
    #[error("configuration error: {0}")]
    Config(String),

    /// A command-line value could not be understood.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Filesystem I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SleeplogError {
    /// Whether this error rejects what the user asked for (a bad value or a
    /// transition the tracker does not allow) rather than an infrastructure
    /// failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidInterval { .. }
                | Self::AlreadySleeping { .. }
                | Self::NotSleeping
                | Self::InvalidInput(_)
        )
    }
}
