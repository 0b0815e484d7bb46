use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::openlibrary::request::RESULT_LIMIT;
use crate::ui::web::state::AppState;

pub(crate) async fn api_status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "book-finder",
        "version": env!("CARGO_PKG_VERSION"),
        "default_field": state.default_field.param_name(),
        "result_limit": RESULT_LIMIT,
    }))
}
