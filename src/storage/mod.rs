//! Storage layer for sleeplog.
//!
//! This module provides SQLite-based persistence for:
//! - Completed sleep sessions
//! - The tracker's open-sleep slot

mod database;
mod journal;
mod migrations;

pub use database::Database;
pub use journal::{SessionStore, SleepJournal};

#[cfg(test)]
pub use journal::MockSessionStore;
