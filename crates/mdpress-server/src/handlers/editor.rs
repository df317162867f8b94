//! Editor page and its assets, embedded in the binary.

use axum::http::header;
use axum::response::{Html, IntoResponse};

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const EDITOR_JS: &str = include_str!("../../assets/editor.js");
const EDITOR_CSS: &str = include_str!("../../assets/editor.css");

/// Handle GET /.
pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Handle GET /static/editor.js.
pub(crate) async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        EDITOR_JS,
    )
}

/// Handle GET /static/editor.css.
pub(crate) async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], EDITOR_CSS)
}
