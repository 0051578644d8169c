//! Productivity statistics.

use rusqlite::Connection;

use crate::types::Stats;

use super::{Database, StoreError};

impl Database {
    /// Computes the four summary values from the current tables.
    ///
    /// Each value is a separate query; no snapshot isolation is attempted.
    pub async fn stats(&self) -> Result<Stats, StoreError> {
        let conn = self.conn.lock().await;

        let total_pomodoros = count(&conn, "SELECT COUNT(*) FROM sessions")?;
        let total_seconds = count(&conn, "SELECT COALESCE(SUM(duration), 0) FROM sessions")?;
        let completed_tasks = count(&conn, "SELECT COUNT(*) FROM tasks WHERE completed = 1")?;
        let active_tasks = count(&conn, "SELECT COUNT(*) FROM tasks WHERE completed = 0")?;

        Ok(Stats {
            total_pomodoros,
            total_minutes: Stats::minutes_from_seconds(total_seconds),
            completed_tasks,
            active_tasks,
        })
    }
}

/// Runs a single-value aggregate; SQLite integers are signed.
fn count(conn: &Connection, sql: &str) -> rusqlite::Result<u64> {
    let value: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(u64::try_from(value).unwrap_or_default())
}
