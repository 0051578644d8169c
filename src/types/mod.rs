//! Core data types for FocusTools.
//!
//! This module defines the data structures used for:
//! - Task and session records as they travel over the REST surface
//! - List/sort/filter options shared by the server and the client
//! - Timer state for the focus timer

mod session;
mod task;
mod timer;

use serde::{Deserialize, Serialize};

pub use session::{
    NewSession, PopulatedSession, Session, SessionListParams, SessionSortField, Stats,
};
pub use task::{
    DeletedTask, NewTask, Task, TaskListOptions, TaskListParams, TaskSelection, TaskSortField,
    TaskUpdate,
};
pub use timer::{TimerPhase, TimerState};

// ============================================================================
// Sorting
// ============================================================================

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending (default)
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    /// Interprets an `order` query parameter.
    ///
    /// Only `desc` selects descending order; anything else, including a
    /// missing parameter, is ascending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    /// Returns the query parameter form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Returns the SQL keyword for this direction.
    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

// ============================================================================
// Response bodies
// ============================================================================

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
}

impl ErrorBody {
    /// Creates an error body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
