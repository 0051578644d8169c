//! Integration tests for the REST API.
//!
//! Each test starts the server on an ephemeral port with a private
//! in-memory database and talks to it over HTTP, either with raw `reqwest`
//! requests (to check status codes and bodies) or through `ApiClient`.

use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use focustools::cli::{ApiClient, ClientError};
use focustools::server;
use focustools::store::Database;
use focustools::types::{SessionSortField, SortOrder, TaskListOptions, TaskSortField, TaskUpdate};

// ============================================================================
// Test Helpers
// ============================================================================

struct TestServer {
    base: String,
    http: reqwest::Client,
    client: ApiClient,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    async fn start() -> Self {
        let db = Database::open_in_memory().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            server::serve(listener, db, shutdown).await.unwrap();
        });

        let base = format!("http://{}", addr);
        Self {
            client: ApiClient::new(&base).unwrap(),
            http: reqwest::Client::new(),
            base,
            _shutdown: shutdown_tx,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self.http.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self.http.post(self.url(path)).json(&body).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self.http.put(self.url(path)).json(&body).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let response = self.http.delete(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn create_task(&self, title: &str) -> Value {
        let (status, body) = self.post("/api/tasks", json!({ "title": title })).await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }
}

fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap().to_string())
        .collect()
}

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

// ============================================================================
// Service
// ============================================================================

#[tokio::test]
async fn index_describes_service() {
    let server = TestServer::start().await;
    let (status, body) = server.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "FocusTools API");
    assert_eq!(body["endpoints"]["sessions"], "/api/sessions");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let server = TestServer::start().await;
    let response = server
        .http
        .get(server.url("/api/tasks"))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

// ============================================================================
// Tasks
// ============================================================================

#[tokio::test]
async fn create_task_returns_defaults() {
    let server = TestServer::start().await;
    let task = server.create_task("Write report").await;

    assert_eq!(task["title"], "Write report");
    assert_eq!(task["completed"], false);
    assert_eq!(task["pomodoroCount"], 0);
    assert!(task["_id"].as_str().is_some());
    assert!(task["createdAt"].as_str().is_some());
}

#[tokio::test]
async fn create_task_rejects_empty_title() {
    let server = TestServer::start().await;

    let (status, body) = server.post("/api/tasks", json!({ "title": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("title"));

    let (status, _) = server.post("/api/tasks", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = server.get("/api/tasks").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let server = TestServer::start().await;
    let response = server
        .http
        .post(server.url("/api/tasks"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn list_filters_and_sorts() {
    let server = TestServer::start().await;
    let b = server.create_task("b").await;
    server.create_task("c").await;
    server.create_task("a").await;
    server
        .put(
            &format!("/api/tasks/{}", b["_id"].as_str().unwrap()),
            json!({ "completed": true }),
        )
        .await;

    let (_, all) = server.get("/api/tasks").await;
    assert_eq!(titles(&all), ["b", "c", "a"]);

    let (_, sorted) = server.get("/api/tasks?sortBy=title&order=desc").await;
    assert_eq!(titles(&sorted), ["c", "b", "a"]);

    let (_, ascending) = server.get("/api/tasks?sortBy=title&order=sideways").await;
    assert_eq!(titles(&ascending), ["a", "b", "c"]);

    let (_, unknown) = server.get("/api/tasks?sortBy=mood&order=desc").await;
    assert_eq!(titles(&unknown), ["b", "c", "a"]);

    let (_, done) = server.get("/api/tasks?completed=true").await;
    assert_eq!(titles(&done), ["b"]);

    let (_, open) = server.get("/api/tasks?completed=no").await;
    assert_eq!(titles(&open), ["c", "a"]);
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let server = TestServer::start().await;
    server.create_task("Foobar").await;
    server.create_task("baz").await;

    let (status, found) = server.get("/api/tasks/search?q=foo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&found), ["Foobar"]);
}

#[tokio::test]
async fn search_requires_query() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/api/tasks/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Search query 'q' is required");

    let (status, _) = server.get("/api/tasks/search?q=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_unknown_task_is_not_found() {
    let server = TestServer::start().await;
    let (status, body) = server.get("/api/tasks/does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found");
}

#[tokio::test]
async fn update_task_validates() {
    let server = TestServer::start().await;
    let task = server.create_task("Draft").await;
    let path = format!("/api/tasks/{}", task["_id"].as_str().unwrap());

    let (status, updated) = server
        .put(&path, json!({ "title": "Final", "pomodoroCount": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["pomodoroCount"], 2);
    assert_eq!(updated["completed"], false);

    let (status, _) = server.put(&path, json!({ "title": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.put(&path, json!({ "pomodoroCount": -1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .put("/api/tasks/missing", json!({ "title": "x" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_removed_task() {
    let server = TestServer::start().await;
    let task = server.create_task("Old").await;
    let path = format!("/api/tasks/{}", task["_id"].as_str().unwrap());

    let (status, body) = server.delete(&path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");
    assert_eq!(body["task"]["title"], "Old");

    let (status, _) = server.get(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_task_changes_nothing() {
    let server = TestServer::start().await;
    server.create_task("Keep").await;

    let (status, body) = server.delete("/api/tasks/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found");

    let (_, all) = server.get("/api/tasks").await;
    assert_eq!(titles(&all), ["Keep"]);
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn create_session_validates_reference_and_duration() {
    let server = TestServer::start().await;
    let task = server.create_task("Write").await;
    let task_id = task["_id"].as_str().unwrap();

    let (status, session) = server
        .post(
            "/api/sessions",
            json!({ "taskId": task_id, "duration": 1500, "startTime": "2024-05-01T10:00:00Z" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["taskId"], task_id);
    assert_eq!(session["completed"], true);

    let (status, _) = server
        .post(
            "/api/sessions",
            json!({ "taskId": "missing", "duration": 1500, "startTime": "2024-05-01T10:00:00Z" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post(
            "/api/sessions",
            json!({ "taskId": task_id, "duration": 0, "startTime": "2024-05-01T10:00:00Z" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server
        .post("/api/sessions", json!({ "taskId": task_id, "duration": 60 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sessions_sort_by_date_desc() {
    let server = TestServer::start().await;
    let task = server.create_task("Write").await;
    let task_id = task["_id"].as_str().unwrap().to_string();
    let base = at("2024-05-01T10:00:00Z");

    for hours in [1, 3, 2] {
        server
            .client
            .log_session(&task_id, 60, base + Duration::hours(hours), true)
            .await
            .unwrap();
    }

    let (status, body) = server.get("/api/sessions?sortBy=date&order=desc").await;
    assert_eq!(status, StatusCode::OK);
    let starts: Vec<DateTime<Utc>> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| at(s["startTime"].as_str().unwrap()))
        .collect();
    assert_eq!(
        starts,
        vec![
            base + Duration::hours(3),
            base + Duration::hours(2),
            base + Duration::hours(1)
        ]
    );
    assert_eq!(body[0]["taskId"]["title"], "Write");
}

#[tokio::test]
async fn task_history_and_deleted_task() {
    let server = TestServer::start().await;
    let keep = server.create_task("Keep").await;
    let gone = server.create_task("Gone").await;
    let keep_id = keep["_id"].as_str().unwrap();
    let gone_id = gone["_id"].as_str().unwrap();

    for id in [keep_id, gone_id, keep_id] {
        server.client.log_session(id, 60, Utc::now(), true).await.unwrap();
    }

    let (_, history) = server.get(&format!("/api/tasks/{}/sessions", keep_id)).await;
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(history[0]["taskId"]["_id"], keep_id);

    server.delete(&format!("/api/tasks/{}", gone_id)).await;

    let (_, all) = server.get("/api/sessions").await;
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert!(all[1]["taskId"].is_null());
}

// ============================================================================
// Stats
// ============================================================================

#[tokio::test]
async fn stats_empty() {
    let server = TestServer::start().await;
    let (status, body) = server.get("/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "totalPomodoros": 0, "totalMinutes": 0, "completedTasks": 0, "activeTasks": 0 })
    );
}

#[tokio::test]
async fn stats_after_activity() {
    let server = TestServer::start().await;
    let task = server.client.create_task("Write").await.unwrap();
    server.client.create_task("Read").await.unwrap();
    server.client.toggle_task(&task.id).await.unwrap();
    server.client.log_session(&task.id, 1500, Utc::now(), true).await.unwrap();
    server.client.log_session(&task.id, 45, Utc::now(), false).await.unwrap();

    let stats = server.client.stats().await.unwrap();
    assert_eq!(stats.total_pomodoros, 2);
    // 1545 s = 25.75 min
    assert_eq!(stats.total_minutes, 26);
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(stats.active_tasks, 1);
}

// ============================================================================
// ApiClient
// ============================================================================

#[tokio::test]
async fn client_task_round_trip() {
    let server = TestServer::start().await;
    let client = &server.client;

    let task = client.create_task("Plan").await.unwrap();
    assert_eq!(client.get_task(&task.id).await.unwrap(), task);

    let toggled = client.toggle_task(&task.id).await.unwrap();
    assert!(toggled.completed);
    let toggled = client.toggle_task(&task.id).await.unwrap();
    assert!(!toggled.completed);

    let incremented = client.increment_pomodoros(&task.id).await.unwrap();
    assert_eq!(incremented.pomodoro_count, 1);

    let edited = client
        .update_task(
            &task.id,
            &TaskUpdate {
                completed: Some(true),
                ..TaskUpdate::default()
            },
        )
        .await
        .unwrap();
    assert!(edited.completed);
    assert_eq!(edited.pomodoro_count, 1);

    let deleted = client.delete_task(&task.id).await.unwrap();
    assert_eq!(deleted.task.id, task.id);
}

#[tokio::test]
async fn client_rename_skips_blank_and_unchanged() {
    let server = TestServer::start().await;
    let client = &server.client;
    let task = client.create_task("Plan").await.unwrap();

    assert!(client.rename_task(&task.id, "  ").await.unwrap().is_none());
    assert!(client.rename_task(&task.id, "Plan").await.unwrap().is_none());

    let renamed = client.rename_task(&task.id, " Plan v2 ").await.unwrap().unwrap();
    assert_eq!(renamed.title, "Plan v2");
}

#[tokio::test]
async fn client_list_options_and_search() {
    let server = TestServer::start().await;
    let client = &server.client;
    for title in ["b", "a", "c"] {
        client.create_task(title).await.unwrap();
    }

    let options = TaskListOptions {
        completed: Some(false),
        sort: Some((TaskSortField::Title, SortOrder::Asc)),
    };
    let listed: Vec<_> = client
        .list_tasks(&options)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(listed, ["a", "b", "c"]);

    let found = client.search_tasks("B").await.unwrap();
    assert_eq!(found.len(), 1);

    let sessions = client
        .list_sessions(Some((SessionSortField::StartTime, SortOrder::Desc)))
        .await
        .unwrap();
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn client_reports_server_errors() {
    let server = TestServer::start().await;
    let err = server.client.get_task("missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(
        err,
        ClientError::Api { status: 404, ref message } if message == "Task not found"
    ));
}
