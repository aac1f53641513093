//! sleeplog - a sleep journal for the terminal
//!
//! Tracks one open sleep at a time, stores finished sessions in SQLite, and
//! derives awake time and rolling weekly averages from them.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod output;
pub mod sleep;
pub mod storage;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::SleeplogError;
pub use sleep::{build_view, MetricsView, SessionRecord, SleepTracker, TrackerState};
pub use storage::{SessionStore, SleepJournal};
