//! HTTP client for the FocusTools REST API.
//!
//! This module provides:
//! - Typed calls for every task, session and stats endpoint
//! - The client-side compound operations (toggle, rename, pomodoro credit)
//! - Error mapping from `{"error": message}` bodies
//!
//! Requests are never retried; a failure is returned to the caller as is.

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::types::{
    DeletedTask, ErrorBody, NewSession, NewTask, PopulatedSession, Session, SessionSortField,
    SortOrder, Stats, Task, TaskListOptions, TaskUpdate,
};

/// Default server base URL.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3001";

/// Environment variable overriding the server base URL.
pub const SERVER_URL_ENV: &str = "FOCUSTOOLS_URL";

// ============================================================================
// ClientError
// ============================================================================

/// Errors returned by [`ApiClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error status.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// The request did not reach the server.
    #[error("could not reach the FocusTools server at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not what the endpoint returns.
    #[error("unexpected response from server: {0}")]
    Decode(#[source] reqwest::Error),

    /// The configured base URL cannot be used.
    #[error("invalid server URL '{0}'")]
    InvalidUrl(String),
}

impl ClientError {
    /// Returns true for a 404 answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

// ============================================================================
// ApiClient
// ============================================================================

/// Client for one FocusTools server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    /// Creates a client for the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base =
            Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Builds `<base>/api/<segments...>`, escaping each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty().push("api");
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, ClientError> {
        debug!("Request to {}", url);
        let response = request.send().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(ClientError::Decode);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    // ------------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------------

    pub async fn create_task(&self, title: &str) -> Result<Task, ClientError> {
        let url = self.endpoint(&["tasks"])?;
        let request = self.client.post(url.clone()).json(&NewTask::titled(title));
        self.send(request, &url).await
    }

    pub async fn list_tasks(&self, options: &TaskListOptions) -> Result<Vec<Task>, ClientError> {
        let url = self.endpoint(&["tasks"])?;
        let request = self.client.get(url.clone()).query(&options.to_query());
        self.send(request, &url).await
    }

    pub async fn search_tasks(&self, query: &str) -> Result<Vec<Task>, ClientError> {
        let url = self.endpoint(&["tasks", "search"])?;
        let request = self.client.get(url.clone()).query(&[("q", query)]);
        self.send(request, &url).await
    }

    pub async fn get_task(&self, id: &str) -> Result<Task, ClientError> {
        let url = self.endpoint(&["tasks", id])?;
        self.send(self.client.get(url.clone()), &url).await
    }

    pub async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, ClientError> {
        let url = self.endpoint(&["tasks", id])?;
        let request = self.client.put(url.clone()).json(update);
        self.send(request, &url).await
    }

    pub async fn delete_task(&self, id: &str) -> Result<DeletedTask, ClientError> {
        let url = self.endpoint(&["tasks", id])?;
        self.send(self.client.delete(url.clone()), &url).await
    }

    pub async fn task_sessions(&self, id: &str) -> Result<Vec<PopulatedSession>, ClientError> {
        let url = self.endpoint(&["tasks", id, "sessions"])?;
        self.send(self.client.get(url.clone()), &url).await
    }

    /// Flips the completion flag: reads the task, then writes `!completed`.
    pub async fn toggle_task(&self, id: &str) -> Result<Task, ClientError> {
        let task = self.get_task(id).await?;
        let update = TaskUpdate {
            completed: Some(!task.completed),
            ..TaskUpdate::default()
        };
        self.update_task(id, &update).await
    }

    /// Renames a task.
    ///
    /// Returns `Ok(None)` without writing when the new title is blank or the
    /// same as the current one.
    pub async fn rename_task(&self, id: &str, title: &str) -> Result<Option<Task>, ClientError> {
        let task = self.get_task(id).await?;
        let Some(title) = rename_title(&task.title, title) else {
            debug!("Rename of {} skipped", id);
            return Ok(None);
        };
        let update = TaskUpdate {
            title: Some(title),
            ..TaskUpdate::default()
        };
        self.update_task(id, &update).await.map(Some)
    }

    /// Adds one completed pomodoro to a task's count.
    pub async fn increment_pomodoros(&self, id: &str) -> Result<Task, ClientError> {
        let task = self.get_task(id).await?;
        let update = TaskUpdate {
            pomodoro_count: Some(task.pomodoro_count.saturating_add(1)),
            ..TaskUpdate::default()
        };
        self.update_task(id, &update).await
    }

    // ------------------------------------------------------------------------
    // Sessions / Stats
    // ------------------------------------------------------------------------

    pub async fn create_session(&self, session: &NewSession) -> Result<Session, ClientError> {
        let url = self.endpoint(&["sessions"])?;
        let request = self.client.post(url.clone()).json(session);
        self.send(request, &url).await
    }

    /// Logs a session for `task_id`.
    pub async fn log_session(
        &self,
        task_id: &str,
        duration_seconds: u32,
        start_time: DateTime<Utc>,
        completed: bool,
    ) -> Result<Session, ClientError> {
        self.create_session(&NewSession::for_task(
            task_id,
            duration_seconds,
            start_time,
            completed,
        ))
        .await
    }

    pub async fn list_sessions(
        &self,
        sort: Option<(SessionSortField, SortOrder)>,
    ) -> Result<Vec<PopulatedSession>, ClientError> {
        let url = self.endpoint(&["sessions"])?;
        let mut request = self.client.get(url.clone());
        if let Some((field, order)) = sort {
            request = request.query(&[("sortBy", field.as_str()), ("order", order.as_str())]);
        }
        self.send(request, &url).await
    }

    pub async fn stats(&self) -> Result<Stats, ClientError> {
        let url = self.endpoint(&["stats"])?;
        self.send(self.client.get(url.clone()), &url).await
    }
}

/// Decides the title a rename writes.
///
/// The new title is trimmed; nothing is written when it is empty or equal to
/// the current title.
pub fn rename_title(current: &str, new_title: &str) -> Option<String> {
    let trimmed = new_title.trim();
    if trimmed.is_empty() || trimmed == current {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
