// Web server: read-only JSON API over collected pages.
//
// GET /health
// GET /api                         endpoint index
// GET /api/blogs                   paginated, ?page= ?limit= ?sortBy= ?sortOrder=
// GET /api/blogs/title/{title}     exact title
// GET /api/blogs/search/{query}    title or content, case-insensitive
// GET /api/stats
// GET /api/titles

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::catalog::Catalog;

pub mod handlers;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }
}

/// Start the API server and block until it exits.
pub async fn run_server(catalog: Catalog, port: u16, bind: &str) -> Result<()> {
    let count = catalog.len();
    let app = build_router(AppState::new(catalog));

    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local: SocketAddr = listener.local_addr()?;
    info!(blogs = count, "Blog API listening on http://{local}");

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api", get(api_index))
        .route("/api/blogs", get(handlers::blogs::list_blogs))
        .route(
            "/api/blogs/title/{title}",
            get(handlers::blogs::get_blog_by_title),
        )
        .route(
            "/api/blogs/search/{query}",
            get(handlers::blogs::search_blogs),
        )
        .route("/api/stats", get(handlers::stats::get_stats))
        .route("/api/titles", get(handlers::stats::list_titles));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .fallback(not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Blog API is running",
            "timestamp": Utc::now(),
        })),
    )
}

async fn api_index() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Blog API",
        "endpoints": {
            "GET /api/blogs": "List blogs (?page, ?limit, ?sortBy=title|createdAt, ?sortOrder=asc|desc)",
            "GET /api/blogs/title/{title}": "Get a blog by exact title",
            "GET /api/blogs/search/{query}": "Search titles and content (?page, ?limit)",
            "GET /api/stats": "Collection statistics",
            "GET /api/titles": "All titles, alphabetical",
            "GET /health": "Health check",
        },
    }))
}

async fn not_found() -> Response {
    api_error(StatusCode::NOT_FOUND, "Route not found")
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "success": false, "message": message })),
    )
        .into_response()
}
