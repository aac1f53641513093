//! `SQLite` database connection and operations.
//!
//! The database is stored at `~/.sleeplog/sleeplog.db` and contains tables for:
//! - Completed sleep sessions
//! - The open-sleep slot of the tracker

use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::debug;

use crate::config::Paths;
use crate::error::SleeplogError;

use super::migrations;

/// How long a writer waits for another process holding the write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at the default location.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open() -> Result<Self, SleeplogError> {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open the database at a specific path.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &std::path::Path) -> Result<Self, SleeplogError> {
        let conn = Connection::open(path).map_err(|e| {
            SleeplogError::Database(format!("Failed to open database {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "opened database");

        Self::init(conn)
    }

    /// Open an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, SleeplogError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            SleeplogError::Database(format!("Failed to open in-memory database: {e}"))
        })?;

        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, SleeplogError> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| SleeplogError::Database(format!("Failed to set busy timeout: {e}")))?;

        let db = Self { conn };
        db.migrate()?;

        Ok(db)
    }

    /// Run database migrations.
    fn migrate(&self) -> Result<(), SleeplogError> {
        migrations::run(&self.conn)
    }

    /// Get a reference to the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction that takes the write lock immediately.
    ///
    /// Read-modify-write sequences run inside one of these so that two
    /// processes cannot act on the same tracker state.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired within the busy timeout.
    pub fn immediate_transaction(&mut self) -> Result<Transaction<'_>, SleeplogError> {
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| SleeplogError::Database(format!("Failed to begin transaction: {e}")))
    }
}
