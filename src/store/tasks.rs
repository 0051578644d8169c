//! Task records.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use crate::types::{NewTask, Task, TaskListOptions, TaskUpdate};

use super::{format_timestamp, now, timestamp_column, Database, StoreError};

const TASK_COLUMNS: &str = "id, title, completed, pomodoro_count, created_at, updated_at";

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        completed: row.get("completed")?,
        pomodoro_count: row.get("pomodoro_count")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

/// Looks up one task on an already locked connection.
pub(super) fn find_task(conn: &Connection, id: &str) -> rusqlite::Result<Option<Task>> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .optional()
}

impl Database {
    /// Creates a task from a validated request.
    pub async fn create_task(&self, request: NewTask) -> Result<Task, StoreError> {
        let title = request.validated_title().map_err(StoreError::Validation)?;
        let timestamp = now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title,
            completed: request.completed.unwrap_or(false),
            pomodoro_count: 0,
            created_at: timestamp,
            updated_at: timestamp,
        };

        let conn = self.conn.lock().await;
        conn.execute(
            &format!("INSERT INTO tasks ({TASK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![
                task.id,
                task.title,
                task.completed,
                task.pomodoro_count,
                format_timestamp(&task.created_at),
                format_timestamp(&task.updated_at),
            ],
        )?;
        debug!("Created task {}", task.id);
        Ok(task)
    }

    /// Lists tasks, optionally filtered by completion and sorted.
    ///
    /// Without a sort field tasks come back in insertion order.
    pub async fn list_tasks(&self, options: TaskListOptions) -> Result<Vec<Task>, StoreError> {
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks");
        if options.completed.is_some() {
            sql.push_str(" WHERE completed = ?1");
        }
        match options.sort {
            Some((field, order)) => {
                sql.push_str(&format!(" ORDER BY {} {}, rowid", field.column(), order.sql()));
            }
            None => sql.push_str(" ORDER BY rowid"),
        }

        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&sql)?;
        let rows = match options.completed {
            Some(completed) => stmt.query_map(params![completed], row_to_task)?,
            None => stmt.query_map([], row_to_task)?,
        };
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Returns tasks whose title contains `query`, ignoring case.
    pub async fn search_tasks(&self, query: &str) -> Result<Vec<Task>, StoreError> {
        let needle = query.to_lowercase();
        let tasks = self.list_tasks(TaskListOptions::default()).await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.title.to_lowercase().contains(&needle))
            .collect())
    }

    pub async fn get_task(&self, id: &str) -> Result<Task, StoreError> {
        let conn = self.conn.lock().await;
        find_task(&conn, id)?.ok_or_else(StoreError::task_not_found)
    }

    /// Applies a partial update and returns the stored record.
    pub async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<Task, StoreError> {
        let update = update.validated().map_err(StoreError::Validation)?;

        let conn = self.conn.lock().await;
        let mut task = find_task(&conn, id)?.ok_or_else(StoreError::task_not_found)?;
        update.apply_to(&mut task);
        task.updated_at = now();

        conn.execute(
            "UPDATE tasks SET title = ?1, completed = ?2, pomodoro_count = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                task.title,
                task.completed,
                task.pomodoro_count,
                format_timestamp(&task.updated_at),
                task.id,
            ],
        )?;
        debug!("Updated task {}", task.id);
        Ok(task)
    }

    /// Deletes a task and returns the removed record.
    ///
    /// Sessions referencing the task are kept.
    pub async fn delete_task(&self, id: &str) -> Result<Task, StoreError> {
        let conn = self.conn.lock().await;
        let task = find_task(&conn, id)?.ok_or_else(StoreError::task_not_found)?;
        conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        debug!("Deleted task {}", id);
        Ok(task)
    }
}
