// Blog list, lookup and search handlers.
//
// Query values are taken as raw strings so a malformed ?page= or ?limit=
// falls back to the default instead of rejecting the request.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::catalog::{PageRequest, SortField, SortOrder, MAX_LIST_LIMIT, MAX_SEARCH_LIMIT};
use crate::web::{api_error, AppState};

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Page number (1-based)
    pub page: Option<String>,
    /// Results per page (default 10, max 100)
    pub limit: Option<String>,
    /// title | createdAt
    pub sort_by: Option<String>,
    /// asc | desc
    pub sort_order: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct SearchQuery {
    pub page: Option<String>,
    /// Results per page (default 10, max 50)
    pub limit: Option<String>,
}

/// GET /api/blogs
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> impl IntoResponse {
    let request = PageRequest::parse(
        params.page.as_deref(),
        params.limit.as_deref(),
        MAX_LIST_LIMIT,
    );
    let page = state.catalog.list(
        SortField::parse(params.sort_by.as_deref()),
        SortOrder::parse(params.sort_order.as_deref()),
        request,
    );

    Json(json!({
        "success": true,
        "data": page.items,
        "pagination": {
            "currentPage": page.current_page,
            "totalPages": page.total_pages,
            "totalBlogs": page.total_blogs,
            "blogsPerPage": page.blogs_per_page,
            "hasNextPage": page.has_next_page,
            "hasPrevPage": page.has_prev_page,
        },
    }))
}

/// GET /api/blogs/title/{title}
pub async fn get_blog_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Response {
    match state.catalog.find_by_title(&title) {
        Some(blog) => Json(json!({ "success": true, "data": blog })).into_response(),
        None => api_error(StatusCode::NOT_FOUND, "Blog not found"),
    }
}

/// GET /api/blogs/search/{query}
pub async fn search_blogs(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let request = PageRequest::parse(
        params.page.as_deref(),
        params.limit.as_deref(),
        MAX_SEARCH_LIMIT,
    );
    match state.catalog.search(&query, request) {
        Ok(page) => Json(json!({
            "success": true,
            "data": page.items,
            "pagination": {
                "currentPage": page.current_page,
                "totalPages": page.total_pages,
                "totalResults": page.total_blogs,
                "resultsPerPage": page.blogs_per_page,
                "hasNextPage": page.has_next_page,
                "hasPrevPage": page.has_prev_page,
                "searchQuery": query.trim(),
            },
        }))
        .into_response(),
        Err(e) => api_error(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}
