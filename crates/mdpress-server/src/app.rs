//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Largest accepted form body.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let page_routes = Router::new()
        .route("/", get(handlers::editor::index))
        .route("/static/editor.js", get(handlers::editor::script))
        .route("/static/editor.css", get(handlers::editor::stylesheet));

    let api_routes = Router::new()
        .route("/api/config", get(handlers::config::get_config))
        .route("/preview", post(handlers::preview::post_preview))
        .route("/export", post(handlers::export::post_export));

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
