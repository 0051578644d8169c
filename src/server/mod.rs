//! REST service over the task and session store.
//!
//! All data endpoints are mounted under `/api`; `GET /` describes the
//! service. Every error response is `{"error": message}`.

mod error;
mod sessions;
mod stats;
mod tasks;

use std::future::Future;
use std::net::SocketAddr;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::store::Database;

pub use error::ApiError;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3001;

/// Shared state of every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

#[derive(Debug, Serialize)]
struct Endpoints {
    tasks: &'static str,
    sessions: &'static str,
    stats: &'static str,
    search: &'static str,
}

#[derive(Debug, Serialize)]
struct ServiceInfo {
    message: &'static str,
    status: &'static str,
    version: &'static str,
    endpoints: Endpoints,
}

async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "FocusTools API",
        status: "Running",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            tasks: "/api/tasks",
            sessions: "/api/sessions",
            stats: "/api/stats",
            search: "/api/tasks/search?q=keyword",
        },
    })
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route("/tasks/search", get(tasks::search))
        .route(
            "/tasks/:id",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
        .route("/tasks/:id/sessions", get(tasks::sessions))
        .route("/sessions", get(sessions::list).post(sessions::create))
        .route("/stats", get(stats::get))
}

/// Builds the application router.
pub fn router(db: Database) -> Router {
    Router::new()
        .route("/", get(index))
        .nest("/api", api_routes())
        .with_state(AppState { db })
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, db: Database, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("FocusTools API listening on http://{}", addr);
    }
    axum::serve(listener, router(db))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn run(addr: SocketAddr, db: Database) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, db, shutdown_signal()).await
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown requested");
}
