//! SQLite-based session storage and statistics.
//!
//! Provides persistent storage for:
//! - Completed focus sessions
//! - Dashboard tasks
//! - Key-value store for the persisted scheduler state

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::StoreError;
use crate::session::{CompletedSession, SessionStore};
use crate::task::Task;

/// A stored completed-session row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRow {
    pub id: i64,
    pub duration_secs: u64,
    pub completed_at: DateTime<Utc>,
    pub completed: bool,
}

/// Read-side aggregation over the session store.
///
/// Consumers only ever read these; nothing here mutates scheduler state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub completed_sessions: u64,
    pub total_focus_secs: u64,
    pub today_sessions: u64,
    pub today_focus_secs: u64,
    pub open_tasks: u64,
    pub done_tasks: u64,
}

/// SQLite database for sessions, tasks, and scheduler state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/focusdeck/focusdeck.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()
            .map_err(|e| StoreError::QueryFailed(format!("data dir unavailable: {e}")))?
            .join("focusdeck.db");
        let conn = Connection::open(&path).map_err(|source| StoreError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    id            INTEGER PRIMARY KEY AUTOINCREMENT,
                    duration_secs INTEGER NOT NULL,
                    completed_at  TEXT NOT NULL,
                    completed     INTEGER NOT NULL DEFAULT 1
                );

                CREATE TABLE IF NOT EXISTS tasks (
                    id         TEXT PRIMARY KEY,
                    title      TEXT NOT NULL,
                    done       INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);",
            )
            .map_err(StoreError::from)
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Insert one completed session, returning its row id.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(&self, session: &CompletedSession) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO sessions (duration_secs, completed_at, completed)
             VALUES (?1, ?2, ?3)",
            params![
                session.duration_secs,
                session.timestamp.to_rfc3339(),
                session.completed,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All stored sessions, oldest first.
    pub fn list_sessions(&self) -> Result<Vec<SessionRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, duration_secs, completed_at, completed FROM sessions ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, bool>(3)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, duration_secs, completed_at, completed) = row?;
            let completed_at = DateTime::parse_from_rfc3339(&completed_at)
                .map_err(|e| StoreError::QueryFailed(format!("bad timestamp in row {id}: {e}")))?
                .with_timezone(&Utc);
            sessions.push(SessionRow {
                id,
                duration_secs,
                completed_at,
                completed,
            });
        }
        Ok(sessions)
    }

    // ── Stats ────────────────────────────────────────────────────────

    pub fn stats_today(&self) -> Result<Stats, StoreError> {
        let mut stats = self.session_stats(Some(midnight_utc()))?;
        self.fill_task_counts(&mut stats)?;
        Ok(stats)
    }

    pub fn stats_all(&self) -> Result<Stats, StoreError> {
        let mut stats = self.session_stats(None)?;
        self.fill_task_counts(&mut stats)?;
        Ok(stats)
    }

    fn session_stats(&self, since: Option<String>) -> Result<Stats, StoreError> {
        let mut stats = Stats::default();
        let today = midnight_utc();

        let (count, secs) = match &since {
            Some(cutoff) => self.conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(duration_secs), 0)
                 FROM sessions WHERE completed_at >= ?1",
                params![cutoff],
                |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
            )?,
            None => self.conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(duration_secs), 0) FROM sessions",
                [],
                |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
            )?,
        };
        stats.completed_sessions = count;
        stats.total_focus_secs = secs;

        let (today_count, today_secs) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration_secs), 0)
             FROM sessions WHERE completed_at >= ?1",
            params![today],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;
        stats.today_sessions = today_count;
        stats.today_focus_secs = today_secs;

        Ok(stats)
    }

    fn fill_task_counts(&self, stats: &mut Stats) -> Result<(), StoreError> {
        let (open, done) = self.conn.query_row(
            "SELECT
                 COALESCE(SUM(CASE WHEN done = 0 THEN 1 ELSE 0 END), 0),
                 COALESCE(SUM(CASE WHEN done = 1 THEN 1 ELSE 0 END), 0)
             FROM tasks",
            [],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;
        stats.open_tasks = open;
        stats.done_tasks = done;
        Ok(())
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn add_task(&self, task: &Task) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO tasks (id, title, done, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![task.id, task.title, task.done, task.created_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, done, created_at FROM tasks ORDER BY created_at")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            let (id, title, done, created_at) = row?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| StoreError::QueryFailed(format!("bad timestamp for task {id}: {e}")))?
                .with_timezone(&Utc);
            tasks.push(Task {
                id,
                title,
                done,
                created_at,
            });
        }
        Ok(tasks)
    }

    /// Mark a task done/open. Returns false if no such task exists.
    pub fn set_task_done(&self, id: &str, done: bool) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET done = ?2 WHERE id = ?1",
            params![id, done],
        )?;
        Ok(changed > 0)
    }

    /// Delete a task. Returns false if no such task exists.
    pub fn delete_task(&self, id: &str) -> Result<bool, StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ── Key-value store ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl SessionStore for Database {
    fn append(&mut self, session: CompletedSession) -> Result<(), StoreError> {
        self.record_session(&session).map(|_| ())
    }
}

/// Start of today as an RFC 3339 UTC cutoff string.
fn midnight_utc() -> String {
    format!("{}T00:00:00+00:00", Utc::now().format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(duration_secs: u64) -> CompletedSession {
        CompletedSession {
            duration_secs,
            timestamp: Utc::now(),
            completed: true,
        }
    }

    #[test]
    fn record_and_query() {
        let db = Database::open_memory().unwrap();
        db.record_session(&session(1500)).unwrap();
        db.record_session(&session(1500)).unwrap();
        let stats = db.stats_all().unwrap();
        assert_eq!(stats.completed_sessions, 2);
        assert_eq!(stats.total_focus_secs, 3000);
        assert_eq!(stats.today_sessions, 2);
    }

    #[test]
    fn list_sessions_roundtrip() {
        let db = Database::open_memory().unwrap();
        db.record_session(&session(600)).unwrap();
        let rows = db.list_sessions().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].duration_secs, 600);
        assert!(rows[0].completed);
    }

    #[test]
    fn task_lifecycle() {
        let db = Database::open_memory().unwrap();
        let task = Task::new("Call client");
        db.add_task(&task).unwrap();

        let tasks = db.list_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Call client");
        assert!(!tasks[0].done);

        assert!(db.set_task_done(&task.id, true).unwrap());
        let stats = db.stats_all().unwrap();
        assert_eq!(stats.done_tasks, 1);
        assert_eq!(stats.open_tasks, 0);

        assert!(db.delete_task(&task.id).unwrap());
        assert!(db.list_tasks().unwrap().is_empty());
        assert!(!db.delete_task(&task.id).unwrap());
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn database_acts_as_session_store() {
        let mut db = Database::open_memory().unwrap();
        db.append(session(1500)).unwrap();
        assert_eq!(db.stats_all().unwrap().completed_sessions, 1);
    }
}
