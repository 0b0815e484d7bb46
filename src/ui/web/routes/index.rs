use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

use crate::ui::web::templates;

pub(crate) async fn index() -> impl IntoResponse {
    let mut resp = Html(templates::INDEX_HTML).into_response();
    no_store(&mut resp);
    resp
}

pub(crate) async fn asset_css() -> Response {
    asset(templates::APP_CSS, "text/css; charset=utf-8")
}

pub(crate) async fn asset_js() -> Response {
    asset(templates::APP_JS, "application/javascript; charset=utf-8")
}

pub(crate) async fn asset_placeholder() -> Response {
    asset(templates::PLACEHOLDER_SVG, "image/svg+xml")
}

fn asset(body: &'static str, content_type: &'static str) -> Response {
    let mut resp = Response::new(body.into());
    *resp.status_mut() = StatusCode::OK;
    resp.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    no_store(&mut resp);
    resp
}

fn no_store(resp: &mut Response) {
    resp.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate"),
    );
    resp.headers_mut()
        .insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    resp.headers_mut()
        .insert(header::EXPIRES, HeaderValue::from_static("0"));
}
