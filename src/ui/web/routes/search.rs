use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::openlibrary::request::{SearchField, SearchRequest};
use crate::ui::web::state::AppState;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    pub(crate) q: String,
    pub(crate) field: Option<String>,
}

pub(crate) async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Value>, StatusCode> {
    let term = params.q.trim().to_string();
    if term.is_empty() {
        // The page disables submission for blank input; this is the backstop.
        return Ok(Json(json!({"books": [], "num_found": 0})));
    }

    let field = params
        .field
        .as_deref()
        .and_then(SearchField::parse)
        .unwrap_or(state.default_field);
    let request = SearchRequest::new(&term, field).map_err(|_| StatusCode::BAD_REQUEST)?;

    let client = state.client.clone();
    let results = tokio::task::spawn_blocking(move || client.search(&request))
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .map_err(|err| {
            warn!(target: "web", "search failed: {err}");
            StatusCode::BAD_GATEWAY
        })?;

    Ok(Json(json!({
        "books": results.books,
        "num_found": results.total,
    })))
}
