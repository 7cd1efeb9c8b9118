// Collection-wide handlers: statistics and the title index.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::web::AppState;

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "success": true, "data": state.catalog.stats() }))
}

/// GET /api/titles
pub async fn list_titles(State(state): State<AppState>) -> impl IntoResponse {
    let titles = state.catalog.titles();
    Json(json!({
        "success": true,
        "count": titles.len(),
        "data": titles,
    }))
}
