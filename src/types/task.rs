//! Task records and the options used to list them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SortOrder;

// ============================================================================
// Task
// ============================================================================

/// A task on the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Title (never empty)
    pub title: String,
    /// Completion flag
    pub completed: bool,
    /// Number of focus intervals completed for this task
    pub pomodoro_count: u32,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Title; required and non-empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Initial completion flag (defaults to false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl NewTask {
    /// Creates a request for an open task with the given title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    /// Validates the request and returns the trimmed title.
    pub fn validated_title(&self) -> Result<String, String> {
        match self.title.as_deref() {
            None => Err("Task validation failed: title is required".to_string()),
            Some(title) => validate_title(title),
        }
    }
}

/// Body of `PUT /tasks/{id}`: every field is optional and replaces the
/// stored value when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pomodoro_count: Option<u32>,
}

impl TaskUpdate {
    /// Returns true if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none() && self.pomodoro_count.is_none()
    }

    /// Validates the update, trimming the title if one is given.
    pub fn validated(mut self) -> Result<Self, String> {
        if let Some(title) = self.title.as_deref() {
            self.title = Some(validate_title(title)?);
        }
        Ok(self)
    }

    /// Applies the update to a task in place.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(count) = self.pomodoro_count {
            task.pomodoro_count = count;
        }
    }
}

fn validate_title(title: &str) -> Result<String, String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Task validation failed: title must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}

/// Body of a successful `DELETE /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedTask {
    pub message: String,
    pub task: Task,
}

impl DeletedTask {
    pub fn new(task: Task) -> Self {
        Self {
            message: "Task deleted successfully".to_string(),
            task,
        }
    }
}

// ============================================================================
// Listing
// ============================================================================

/// Fields a task list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortField {
    Title,
    Completed,
    PomodoroCount,
    CreatedAt,
    UpdatedAt,
}

impl TaskSortField {
    /// Parses the wire name of a field. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "completed" => Some(Self::Completed),
            "pomodoroCount" => Some(Self::PomodoroCount),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    /// Returns the wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Completed => "completed",
            Self::PomodoroCount => "pomodoroCount",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }

    /// Returns the storage column backing the field.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Completed => "completed",
            Self::PomodoroCount => "pomodoro_count",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Raw query string of `GET /tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListParams {
    pub completed: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Interpreted filter and sort options for listing tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskListOptions {
    /// Only return tasks with this completion flag
    pub completed: Option<bool>,
    /// Sort field and direction; insertion order when absent
    pub sort: Option<(TaskSortField, SortOrder)>,
}

impl TaskListOptions {
    /// Interprets query parameters.
    ///
    /// `completed=true` filters completed tasks and any other value filters
    /// open ones. An unknown `sortBy` field leaves the list unsorted.
    pub fn from_params(params: &TaskListParams) -> Self {
        let completed = params.completed.as_deref().map(|value| value == "true");
        let sort = params
            .sort_by
            .as_deref()
            .and_then(TaskSortField::parse)
            .map(|field| (field, SortOrder::from_param(params.order.as_deref())));
        Self { completed, sort }
    }

    /// Renders the options back into query pairs.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(completed) = self.completed {
            query.push(("completed", completed.to_string()));
        }
        if let Some((field, order)) = self.sort {
            query.push(("sortBy", field.as_str().to_string()));
            query.push(("order", order.as_str().to_string()));
        }
        query
    }
}

// ============================================================================
// Selection
// ============================================================================

/// The task that receives credit for the next completed focus interval.
///
/// At most one task is active at a time. Selecting a task never starts the
/// timer.
#[derive(Debug, Clone, Default)]
pub struct TaskSelection {
    active: Option<Task>,
}

impl TaskSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `task` the active task, replacing any previous selection.
    pub fn select(&mut self, task: Task) {
        self.active = Some(task);
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<&Task> {
        self.active.as_ref()
    }

    pub fn is_active(&self, task_id: &str) -> bool {
        self.active.as_ref().is_some_and(|task| task.id == task_id)
    }

    /// Replaces the active task's record if `task` is the active one.
    pub fn refresh(&mut self, task: Task) {
        if self.is_active(&task.id) {
            self.active = Some(task);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(id: &str, title: &str) -> Task {
        let now = Utc::now();
        Task {
            id: id.to_string(),
            title: title.to_string(),
            completed: false,
            pomodoro_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    mod task_tests {
        use super::*;

        #[test]
        fn test_serialize_uses_wire_names() {
            let task = sample_task("abc", "Write report");
            let json = serde_json::to_value(&task).unwrap();

            assert_eq!(json["_id"], "abc");
            assert_eq!(json["title"], "Write report");
            assert_eq!(json["completed"], false);
            assert_eq!(json["pomodoroCount"], 0);
            assert!(json.get("createdAt").is_some());
            assert!(json.get("updatedAt").is_some());
        }
    }

    mod new_task_tests {
        use super::*;

        #[test]
        fn test_missing_title_rejected() {
            let request: NewTask = serde_json::from_str("{}").unwrap();
            assert!(request.validated_title().unwrap_err().contains("required"));
        }

        #[test]
        fn test_blank_title_rejected() {
            assert!(NewTask::titled("").validated_title().is_err());
            assert!(NewTask::titled("   ").validated_title().is_err());
        }

        #[test]
        fn test_title_is_trimmed() {
            assert_eq!(
                NewTask::titled("  Read paper ").validated_title().unwrap(),
                "Read paper"
            );
        }
    }

    mod task_update_tests {
        use super::*;

        #[test]
        fn test_deserialize_partial() {
            let update: TaskUpdate = serde_json::from_str(r#"{"pomodoroCount":3}"#).unwrap();
            assert_eq!(update.pomodoro_count, Some(3));
            assert!(update.title.is_none());
            assert!(update.completed.is_none());
        }

        #[test]
        fn test_negative_count_does_not_deserialize() {
            let result = serde_json::from_str::<TaskUpdate>(r#"{"pomodoroCount":-1}"#);
            assert!(result.is_err());
        }

        #[test]
        fn test_blank_title_rejected() {
            let update = TaskUpdate {
                title: Some(" ".to_string()),
                ..Default::default()
            };
            assert!(update.validated().is_err());
        }

        #[test]
        fn test_apply_to_replaces_given_fields_only() {
            let mut task = sample_task("1", "Old");
            let update = TaskUpdate {
                completed: Some(true),
                ..Default::default()
            };
            update.apply_to(&mut task);

            assert!(task.completed);
            assert_eq!(task.title, "Old");
            assert_eq!(task.pomodoro_count, 0);
        }

        #[test]
        fn test_is_empty() {
            assert!(TaskUpdate::default().is_empty());
            assert!(!TaskUpdate {
                completed: Some(false),
                ..Default::default()
            }
            .is_empty());
        }
    }

    mod list_options_tests {
        use super::*;

        fn params(completed: Option<&str>, sort_by: Option<&str>, order: Option<&str>) -> TaskListParams {
            TaskListParams {
                completed: completed.map(String::from),
                sort_by: sort_by.map(String::from),
                order: order.map(String::from),
            }
        }

        #[test]
        fn test_completed_filter() {
            let options = TaskListOptions::from_params(&params(Some("true"), None, None));
            assert_eq!(options.completed, Some(true));

            let options = TaskListOptions::from_params(&params(Some("false"), None, None));
            assert_eq!(options.completed, Some(false));

            let options = TaskListOptions::from_params(&params(Some("yes"), None, None));
            assert_eq!(options.completed, Some(false));

            let options = TaskListOptions::from_params(&params(None, None, None));
            assert_eq!(options.completed, None);
        }

        #[test]
        fn test_sort_parsing() {
            let options =
                TaskListOptions::from_params(&params(None, Some("pomodoroCount"), Some("desc")));
            assert_eq!(
                options.sort,
                Some((TaskSortField::PomodoroCount, SortOrder::Desc))
            );

            let options = TaskListOptions::from_params(&params(None, Some("title"), None));
            assert_eq!(options.sort, Some((TaskSortField::Title, SortOrder::Asc)));
        }

        #[test]
        fn test_unknown_sort_field_ignored() {
            let options = TaskListOptions::from_params(&params(None, Some("color"), Some("desc")));
            assert_eq!(options.sort, None);
        }

        #[test]
        fn test_to_query() {
            let options = TaskListOptions {
                completed: Some(false),
                sort: Some((TaskSortField::CreatedAt, SortOrder::Desc)),
            };
            assert_eq!(
                options.to_query(),
                vec![
                    ("completed", "false".to_string()),
                    ("sortBy", "createdAt".to_string()),
                    ("order", "desc".to_string()),
                ]
            );
        }
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_starts_empty() {
            let selection = TaskSelection::new();
            assert!(selection.active().is_none());
        }

        #[test]
        fn test_select_replaces_previous() {
            let mut selection = TaskSelection::new();
            selection.select(sample_task("1", "First"));
            selection.select(sample_task("2", "Second"));

            assert!(selection.is_active("2"));
            assert!(!selection.is_active("1"));
        }

        #[test]
        fn test_clear() {
            let mut selection = TaskSelection::new();
            selection.select(sample_task("1", "First"));
            selection.clear();
            assert!(selection.active().is_none());
        }

        #[test]
        fn test_refresh_only_touches_active_task() {
            let mut selection = TaskSelection::new();
            selection.select(sample_task("1", "First"));

            let mut other = sample_task("2", "Other");
            other.pomodoro_count = 5;
            selection.refresh(other);
            assert_eq!(selection.active().unwrap().pomodoro_count, 0);

            let mut same = sample_task("1", "First");
            same.pomodoro_count = 1;
            selection.refresh(same);
            assert_eq!(selection.active().unwrap().pomodoro_count, 1);
        }
    }
}
