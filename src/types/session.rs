//! Session records and productivity statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SortOrder, Task};

// ============================================================================
// Session
// ============================================================================

/// A logged focus interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: String,
    /// Owning task
    pub task_id: String,
    /// Length of the interval in seconds
    pub duration: u32,
    /// When the interval started
    pub start_time: DateTime<Utc>,
    /// False for an interval that was abandoned before the timer ran out
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A session joined with its owning task.
///
/// `taskId` carries the whole task record, or `null` once the task has been
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedSession {
    #[serde(rename = "_id")]
    pub id: String,
    pub task_id: Option<Task>,
    pub duration: u32,
    pub start_time: DateTime<Utc>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /sessions`.
///
/// Fields are optional at the wire level so that a missing field surfaces as
/// a validation message rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl NewSession {
    /// Creates a request for a session of `task_id`.
    pub fn for_task(
        task_id: impl Into<String>,
        duration: u32,
        start_time: DateTime<Utc>,
        completed: bool,
    ) -> Self {
        Self {
            task_id: Some(task_id.into()),
            duration: Some(i64::from(duration)),
            start_time: Some(start_time),
            completed: Some(completed),
        }
    }

    /// Checks required fields and returns `(task_id, duration, start_time)`.
    ///
    /// Whether the task exists is checked by the store.
    pub fn validated(&self) -> Result<(String, u32, DateTime<Utc>), String> {
        let task_id = match self.task_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err("Session validation failed: taskId is required".to_string()),
        };
        let duration = match self.duration {
            None => return Err("Session validation failed: duration is required".to_string()),
            Some(d) if d < 1 => {
                return Err(format!(
                    "Session validation failed: duration ({d}) must be at least 1 second"
                ))
            }
            Some(d) => u32::try_from(d).map_err(|_| {
                format!("Session validation failed: duration ({d}) is too large")
            })?,
        };
        let start_time = self
            .start_time
            .ok_or_else(|| "Session validation failed: startTime is required".to_string())?;
        Ok((task_id, duration, start_time))
    }
}

/// Fields a session list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSortField {
    TaskId,
    Duration,
    StartTime,
    Completed,
    CreatedAt,
    UpdatedAt,
}

impl SessionSortField {
    /// Parses the wire name of a field; `date` is an alias for `startTime`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "taskId" => Some(Self::TaskId),
            "duration" => Some(Self::Duration),
            "startTime" | "date" => Some(Self::StartTime),
            "completed" => Some(Self::Completed),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskId => "taskId",
            Self::Duration => "duration",
            Self::StartTime => "startTime",
            Self::Completed => "completed",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::TaskId => "s.task_id",
            Self::Duration => "s.duration",
            Self::StartTime => "s.start_time",
            Self::Completed => "s.completed",
            Self::CreatedAt => "s.created_at",
            Self::UpdatedAt => "s.updated_at",
        }
    }
}

/// Raw query string of `GET /sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl SessionListParams {
    /// Interprets the sort parameters; an unknown field means no sorting.
    pub fn sort(&self) -> Option<(SessionSortField, SortOrder)> {
        self.sort_by
            .as_deref()
            .and_then(SessionSortField::parse)
            .map(|field| (field, SortOrder::from_param(self.order.as_deref())))
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Productivity summary returned by `GET /stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of logged sessions
    pub total_pomodoros: u64,
    /// Sum of session durations in minutes, rounded to the nearest minute
    pub total_minutes: u64,
    pub completed_tasks: u64,
    pub active_tasks: u64,
}

impl Stats {
    /// Converts a total in seconds to whole minutes, rounding half up.
    pub fn minutes_from_seconds(total_seconds: u64) -> u64 {
        (total_seconds + 30) / 60
    }
}

// ============================================================================
// Tests
// ============================================================================
