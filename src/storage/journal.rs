//! Sleep journal storage.
//!
//! Persists completed sessions and the tracker's open-sleep slot, and runs
//! tracker transitions atomically against the database.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::Database;
use crate::error::SleeplogError;
use crate::sleep::{SessionRecord, SleepTracker, TrackerState};

/// Append-only store of completed sessions.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore {
    /// Append a finalized session and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    fn insert(&self, record: &SessionRecord) -> Result<i64, SleeplogError>;

    /// All sessions, newest end time first.
    ///
    /// # Errors
    ///
    /// Returns an error if the sessions cannot be read.
    fn query_all(&self) -> Result<Vec<SessionRecord>, SleeplogError>;

    /// Sessions that ended at or after `since`, newest end time first.
    ///
    /// # Errors
    ///
    /// Returns an error if the sessions cannot be read.
    fn query_by_window(&self, since: DateTime<Utc>) -> Result<Vec<SessionRecord>, SleeplogError>;
}

/// SQLite-backed sleep journal.
pub struct SleepJournal {
    db: Database,
}

impl SleepJournal {
    /// Open the journal in the default database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn new() -> Result<Self, SleeplogError> {
        let db = Database::open()?;
        Ok(Self { db })
    }

    /// Create a journal with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Current tracker state as last committed.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be read.
    pub fn tracker_state(&self) -> Result<TrackerState, SleeplogError> {
        load_state(self.db.connection())
    }

    /// Start a sleep at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SleeplogError::AlreadySleeping`] if a sleep is open, or a
    /// database error.
    pub fn begin_sleep(&mut self, now: DateTime<Utc>) -> Result<TrackerState, SleeplogError> {
        let tx = self.db.immediate_transaction()?;

        let mut tracker = SleepTracker::from_state(load_state(&tx)?);
        tracker.begin_sleep(now)?;
        store_state(&tx, tracker.state())?;

        tx.commit()
            .map_err(|e| SleeplogError::Database(format!("Failed to commit sleep start: {e}")))?;

        info!(start = %now, "sleep started");
        Ok(tracker.state())
    }

    /// End the open sleep at `now` and store the finished session.
    ///
    /// The session and the cleared slot are committed together; if the
    /// insert fails the sleep stays open and the call can be retried.
    ///
    /// # Errors
    ///
    /// Returns [`SleeplogError::NotSleeping`], [`SleeplogError::InvalidInterval`],
    /// or a database error.
    pub fn end_sleep(
        &mut self,
        now: DateTime<Utc>,
        is_nap: bool,
    ) -> Result<SessionRecord, SleeplogError> {
        let tx = self.db.immediate_transaction()?;

        let mut tracker = SleepTracker::from_state(load_state(&tx)?);
        let record = tracker.end_sleep(now, is_nap)?;
        let id = insert_record(&tx, &record)?;
        store_state(&tx, tracker.state())?;

        tx.commit()
            .map_err(|e| SleeplogError::Database(format!("Failed to commit sleep end: {e}")))?;

        info!(id, hours = record.duration_hours(), is_nap, "sleep recorded");
        Ok(record.with_id(id))
    }

    /// Record a nap that ended at `end` and lasted `duration`.
    ///
    /// # Errors
    ///
    /// Returns [`SleeplogError::AlreadySleeping`] while a sleep is open,
    /// [`SleeplogError::InvalidInterval`] for a non-positive duration, or a
    /// database error.
    pub fn log_nap(
        &mut self,
        end: DateTime<Utc>,
        duration: Duration,
    ) -> Result<SessionRecord, SleeplogError> {
        let record = SessionRecord::nap(end, duration)?;

        let tx = self.db.immediate_transaction()?;
        if let TrackerState::InProgress { start_time } = load_state(&tx)? {
            return Err(SleeplogError::AlreadySleeping { since: start_time });
        }
        let id = insert_record(&tx, &record)?;
        tx.commit()
            .map_err(|e| SleeplogError::Database(format!("Failed to commit nap: {e}")))?;

        info!(id, minutes = duration.num_minutes(), "nap recorded");
        Ok(record.with_id(id))
    }

    /// Store an already-built session (manual entry) and return it with its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub fn record(&self, record: SessionRecord) -> Result<SessionRecord, SleeplogError> {
        let id = self.insert(&record)?;
        Ok(record.with_id(id))
    }
}

impl SessionStore for SleepJournal {
    fn insert(&self, record: &SessionRecord) -> Result<i64, SleeplogError> {
        let id = insert_record(self.db.connection(), record)?;
        debug!(id, "session inserted");
        Ok(id)
    }

    fn query_all(&self) -> Result<Vec<SessionRecord>, SleeplogError> {
        query_records(
            self.db.connection(),
            r"SELECT id, start_time, end_time, is_nap
              FROM sleep_sessions
              ORDER BY end_time DESC, start_time DESC",
            params![],
        )
    }

    fn query_by_window(&self, since: DateTime<Utc>) -> Result<Vec<SessionRecord>, SleeplogError> {
        query_records(
            self.db.connection(),
            r"SELECT id, start_time, end_time, is_nap
              FROM sleep_sessions
              WHERE end_time >= ?1
              ORDER BY end_time DESC, start_time DESC",
            [format_instant(since)],
        )
    }
}

/// Instants are stored as fixed-width RFC 3339 UTC so text order is time order.
fn format_instant(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_instant_column(row: &Row<'_>, idx: usize) -> Result<DateTime<Utc>, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn insert_record(conn: &Connection, record: &SessionRecord) -> Result<i64, SleeplogError> {
    conn.execute(
        r"INSERT INTO sleep_sessions (start_time, end_time, is_nap)
          VALUES (?1, ?2, ?3)",
        params![
            format_instant(record.start_time()),
            format_instant(record.end_time()),
            record.is_nap(),
        ],
    )
    .map_err(|e| SleeplogError::Database(format!("Failed to insert session: {e}")))?;

    Ok(conn.last_insert_rowid())
}

fn query_records<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<SessionRecord>, SleeplogError> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| SleeplogError::Database(format!("Failed to prepare query: {e}")))?;

    let rows = stmt
        .query_map(params, row_to_session)
        .map_err(|e| SleeplogError::Database(format!("Failed to query sessions: {e}")))?;

    let mut sessions = Vec::new();
    for row in rows {
        sessions.push(row.map_err(|e| SleeplogError::Database(e.to_string()))?);
    }

    Ok(sessions)
}

/// Convert a database row to a `SessionRecord`.
fn row_to_session(row: &Row<'_>) -> Result<SessionRecord, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let start_time = parse_instant_column(row, 1)?;
    let end_time = parse_instant_column(row, 2)?;
    let is_nap: bool = row.get(3)?;

    SessionRecord::new(start_time, end_time, is_nap)
        .map(|record| record.with_id(id))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))
}

fn load_state(conn: &Connection) -> Result<TrackerState, SleeplogError> {
    let start = conn
        .query_row("SELECT sleep_start FROM tracker_state WHERE id = 1", [], |row| {
            match row.get::<_, Option<String>>(0)? {
                Some(_) => parse_instant_column(row, 0).map(Some),
                None => Ok(None),
            }
        })
        .optional()
        .map_err(|e| SleeplogError::Database(format!("Failed to load tracker state: {e}")))?
        .flatten();

    Ok(start.map_or(TrackerState::Idle, |start_time| TrackerState::InProgress {
        start_time,
    }))
}

fn store_state(conn: &Connection, state: TrackerState) -> Result<(), SleeplogError> {
    let start = match state {
        TrackerState::Idle => None,
        TrackerState::InProgress { start_time } => Some(format_instant(start_time)),
    };

    conn.execute(
        r"INSERT INTO tracker_state (id, sleep_start) VALUES (1, ?1)
          ON CONFLICT(id) DO UPDATE SET sleep_start = excluded.sleep_start",
        [start],
    )
    .map_err(|e| SleeplogError::Database(format!("Failed to save tracker state: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_journal() -> SleepJournal {
        let db = Database::open_in_memory().unwrap();
        SleepJournal::with_database(db)
    }

    fn night(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 23, 0, 0).unwrap()
    }

    #[test]
    fn test_fresh_journal_is_idle() {
        let journal = create_test_journal();
        assert_eq!(journal.tracker_state().unwrap(), TrackerState::Idle);
        assert!(journal.query_all().unwrap().is_empty());
    }

    #[test]
    fn test_sleep_and_wake() {
        let mut journal = create_test_journal();

        let state = journal.begin_sleep(night(1)).unwrap();
        assert_eq!(state, TrackerState::InProgress { start_time: night(1) });
        assert_eq!(journal.tracker_state().unwrap(), state);

        let wake = night(1) + Duration::hours(8);
        let record = journal.end_sleep(wake, false).unwrap();
        assert!(record.id().is_some());
        assert_eq!(journal.tracker_state().unwrap(), TrackerState::Idle);

        let all = journal.query_all().unwrap();
        assert_eq!(all, vec![record]);
    }

    #[test]
    fn test_double_begin_is_rejected() {
        let mut journal = create_test_journal();
        journal.begin_sleep(night(1)).unwrap();

        let err = journal.begin_sleep(night(1) + Duration::hours(1)).unwrap_err();
        assert!(matches!(err, SleeplogError::AlreadySleeping { .. }));
        assert_eq!(
            journal.tracker_state().unwrap(),
            TrackerState::InProgress { start_time: night(1) }
        );
    }

    #[test]
    fn test_wake_without_sleep() {
        let mut journal = create_test_journal();
        assert!(matches!(
            journal.end_sleep(night(1), false),
            Err(SleeplogError::NotSleeping)
        ));
        assert!(journal.query_all().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_wake_keeps_sleep_open() {
        let mut journal = create_test_journal();
        journal.begin_sleep(night(1)).unwrap();

        let err = journal.end_sleep(night(1) - Duration::minutes(5), false).unwrap_err();
        assert!(matches!(err, SleeplogError::InvalidInterval { .. }));
        assert!(matches!(
            journal.tracker_state().unwrap(),
            TrackerState::InProgress { .. }
        ));
    }

    #[test]
    fn test_nap_rejected_while_sleeping() {
        let mut journal = create_test_journal();
        journal.begin_sleep(night(1)).unwrap();

        let err = journal
            .log_nap(night(1) + Duration::hours(1), Duration::minutes(20))
            .unwrap_err();
        assert!(matches!(err, SleeplogError::AlreadySleeping { .. }));
        assert!(journal.query_all().unwrap().is_empty());
    }

    #[test]
    fn test_log_nap() {
        let mut journal = create_test_journal();
        let end = night(2) - Duration::hours(8);

        let nap = journal.log_nap(end, Duration::minutes(30)).unwrap();
        assert!(nap.is_nap());
        assert_eq!(nap.end_time(), end);
        assert_eq!(journal.query_all().unwrap(), vec![nap]);
    }

    #[test]
    fn test_query_order_and_window() {
        let journal = create_test_journal();

        for day in [3, 1, 2] {
            let record =
                SessionRecord::new(night(day), night(day) + Duration::hours(7), false).unwrap();
            journal.record(record).unwrap();
        }

        let all = journal.query_all().unwrap();
        let ends: Vec<_> = all.iter().map(SessionRecord::end_time).collect();
        assert_eq!(
            ends,
            vec![
                night(3) + Duration::hours(7),
                night(2) + Duration::hours(7),
                night(1) + Duration::hours(7),
            ]
        );

        let recent = journal.query_by_window(night(2)).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0], all[0]);
    }

    #[test]
    fn test_same_end_ordered_by_later_start() {
        let journal = create_test_journal();
        let end = night(2);

        let long = journal
            .record(SessionRecord::new(end - Duration::hours(9), end, false).unwrap())
            .unwrap();
        let short = journal
            .record(SessionRecord::new(end - Duration::hours(1), end, true).unwrap())
            .unwrap();

        assert_eq!(journal.query_all().unwrap(), vec![short, long]);
    }

    #[test]
    fn test_corrupt_row_is_an_error() {
        let journal = create_test_journal();
        journal
            .db
            .connection()
            .execute(
                "INSERT INTO sleep_sessions (start_time, end_time) VALUES ('not a date', 'zzz')",
                [],
            )
            .unwrap();

        assert!(matches!(
            journal.query_all(),
            Err(SleeplogError::Database(_))
        ));
    }
}
