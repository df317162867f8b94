//! Configuration API endpoint.
//!
//! Returns client-side capabilities for the editor page.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use mdpress_pipeline::Capabilities;

use crate::state::AppState;

/// Handle GET /api/config.
pub(crate) async fn get_config(State(state): State<Arc<AppState>>) -> Json<Capabilities> {
    Json(state.pipeline.capabilities())
}
