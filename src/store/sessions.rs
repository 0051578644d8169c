//! Session log.
//!
//! Sessions are append-only. Listings join each session with its task; a
//! session whose task has been deleted lists with no task.

use chrono::SubsecRound;
use rusqlite::{params, Row};
use tracing::debug;
use uuid::Uuid;

use crate::types::{NewSession, PopulatedSession, Session, SessionSortField, SortOrder, Task};

use super::tasks::find_task;
use super::{format_timestamp, now, timestamp_column, Database, StoreError};

const POPULATED_SELECT: &str = "
SELECT s.id, s.duration, s.start_time, s.completed, s.created_at, s.updated_at,
       t.id AS task_id, t.title AS task_title, t.completed AS task_completed,
       t.pomodoro_count AS task_pomodoro_count, t.created_at AS task_created_at,
       t.updated_at AS task_updated_at
FROM sessions s
LEFT JOIN tasks t ON t.id = s.task_id";

fn row_to_populated(row: &Row<'_>) -> rusqlite::Result<PopulatedSession> {
    let task_id: Option<String> = row.get("task_id")?;
    let task = match task_id {
        Some(id) => Some(Task {
            id,
            title: row.get("task_title")?,
            completed: row.get("task_completed")?,
            pomodoro_count: row.get("task_pomodoro_count")?,
            created_at: timestamp_column(row, "task_created_at")?,
            updated_at: timestamp_column(row, "task_updated_at")?,
        }),
        None => None,
    };

    Ok(PopulatedSession {
        id: row.get("id")?,
        task_id: task,
        duration: row.get("duration")?,
        start_time: timestamp_column(row, "start_time")?,
        completed: row.get("completed")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

impl Database {
    /// Logs a session for an existing task.
    pub async fn create_session(&self, request: NewSession) -> Result<Session, StoreError> {
        let (task_id, duration, start_time) =
            request.validated().map_err(StoreError::Validation)?;
        let timestamp = now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            task_id,
            duration,
            start_time: start_time.trunc_subsecs(3),
            completed: request.completed.unwrap_or(true),
            created_at: timestamp,
            updated_at: timestamp,
        };

        let conn = self.conn.lock().await;
        if find_task(&conn, &session.task_id)?.is_none() {
            return Err(StoreError::Validation(format!(
                "Session validation failed: task {} does not exist",
                session.task_id
            )));
        }

        conn.execute(
            "INSERT INTO sessions (id, task_id, duration, start_time, completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.id,
                session.task_id,
                session.duration,
                format_timestamp(&session.start_time),
                session.completed,
                format_timestamp(&session.created_at),
                format_timestamp(&session.updated_at),
            ],
        )?;
        debug!(
            "Logged {}s session for task {}",
            session.duration, session.task_id
        );
        Ok(session)
    }

    /// Lists all sessions joined with their tasks.
    pub async fn list_sessions(
        &self,
        sort: Option<(SessionSortField, SortOrder)>,
    ) -> Result<Vec<PopulatedSession>, StoreError> {
        let order_by = match sort {
            Some((field, order)) => format!("{} {}, s.rowid", field.column(), order.sql()),
            None => "s.rowid".to_string(),
        };
        let sql = format!("{POPULATED_SELECT} ORDER BY {order_by}");

        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&sql)?;
        let sessions = stmt
            .query_map([], row_to_populated)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }

    /// Lists the sessions of one task in insertion order.
    ///
    /// An unknown task id yields an empty list.
    pub async fn sessions_for_task(
        &self,
        task_id: &str,
    ) -> Result<Vec<PopulatedSession>, StoreError> {
        let sql = format!("{POPULATED_SELECT} WHERE s.task_id = ?1 ORDER BY s.rowid");

        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&sql)?;
        let sessions = stmt
            .query_map(params![task_id], row_to_populated)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewTask;
    use chrono::{DateTime, Duration, Utc};

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    async fn db_with_task(title: &str) -> (Database, Task) {
        let db = Database::open_in_memory().unwrap();
        let task = db.create_task(NewTask::titled(title)).await.unwrap();
        (db, task)
    }

    // ------------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------------

    mod create_tests {
        use super::*;

        #[tokio::test]
        async fn test_create_defaults_to_completed() {
            let (db, task) = db_with_task("Write").await;
            let request = NewSession {
                task_id: Some(task.id.clone()),
                duration: Some(1500),
                start_time: Some(at("2024-05-01T10:00:00Z")),
                completed: None,
            };

            let session = db.create_session(request).await.unwrap();

            assert_eq!(session.task_id, task.id);
            assert_eq!(session.duration, 1500);
            assert!(session.completed);
            assert_eq!(session.start_time, at("2024-05-01T10:00:00Z"));
        }

        #[tokio::test]
        async fn test_create_aborted_session() {
            let (db, task) = db_with_task("Write").await;
            let request = NewSession::for_task(&task.id, 90, Utc::now(), false);

            let session = db.create_session(request).await.unwrap();
            assert!(!session.completed);
        }

        #[tokio::test]
        async fn test_unknown_task_rejected() {
            let (db, _) = db_with_task("Write").await;
            let request = NewSession::for_task("missing", 1500, Utc::now(), true);

            let err = db.create_session(request).await.unwrap_err();
            assert!(matches!(err, StoreError::Validation(_)));
            assert!(db.list_sessions(None).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_zero_duration_rejected() {
            let (db, task) = db_with_task("Write").await;
            let request = NewSession::for_task(&task.id, 0, Utc::now(), true);

            let err = db.create_session(request).await.unwrap_err();
            assert!(matches!(err, StoreError::Validation(_)));
        }
    }

    // ------------------------------------------------------------------------
    // List
    // ------------------------------------------------------------------------

    mod list_tests {
        use super::*;

        #[tokio::test]
        async fn test_list_joins_task() {
            let (db, task) = db_with_task("Write").await;
            db.create_session(NewSession::for_task(&task.id, 60, Utc::now(), true))
                .await
                .unwrap();

            let sessions = db.list_sessions(None).await.unwrap();
            assert_eq!(sessions.len(), 1);
            assert_eq!(sessions[0].task_id.as_ref(), Some(&task));
        }

        #[tokio::test]
        async fn test_sort_by_date_desc() {
            let (db, task) = db_with_task("Write").await;
            let base = at("2024-05-01T10:00:00Z");
            for offset in [2, 0, 1] {
                db.create_session(NewSession::for_task(
                    &task.id,
                    60,
                    base + Duration::hours(offset),
                    true,
                ))
                .await
                .unwrap();
            }

            let sessions = db
                .list_sessions(SessionSortField::parse("date").map(|f| (f, SortOrder::Desc)))
                .await
                .unwrap();
            let starts: Vec<_> = sessions.iter().map(|s| s.start_time).collect();
            assert_eq!(
                starts,
                vec![
                    base + Duration::hours(2),
                    base + Duration::hours(1),
                    base
                ]
            );
        }

        #[tokio::test]
        async fn test_sessions_for_task() {
            let db = Database::open_in_memory().unwrap();
            let a = db.create_task(NewTask::titled("a")).await.unwrap();
            let b = db.create_task(NewTask::titled("b")).await.unwrap();
            for task in [&a, &b, &a] {
                db.create_session(NewSession::for_task(&task.id, 60, Utc::now(), true))
                    .await
                    .unwrap();
            }

            let history = db.sessions_for_task(&a.id).await.unwrap();
            assert_eq!(history.len(), 2);
            assert!(history
                .iter()
                .all(|s| s.task_id.as_ref().map(|t| t.id.as_str()) == Some(a.id.as_str())));
            assert!(db.sessions_for_task("missing").await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_sessions_survive_task_deletion() {
            let (db, task) = db_with_task("Write").await;
            db.create_session(NewSession::for_task(&task.id, 60, Utc::now(), true))
                .await
                .unwrap();

            db.delete_task(&task.id).await.unwrap();

            let sessions = db.list_sessions(None).await.unwrap();
            assert_eq!(sessions.len(), 1);
            assert!(sessions[0].task_id.is_none());
        }
    }
}
