//! Preview endpoint.

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::response::Html;

use crate::error::ServerError;
use crate::handlers::EditorForm;
use crate::state::AppState;

/// Handle POST /preview.
///
/// Renders the posted Markdown to an HTML fragment. Diagram failures are
/// reported inside the fragment, so this only fails if the worker dies.
pub(crate) async fn post_preview(
    State(state): State<Arc<AppState>>,
    Form(form): Form<EditorForm>,
) -> Result<Html<String>, ServerError> {
    let worker = Arc::clone(&state);
    let result =
        tokio::task::spawn_blocking(move || worker.pipeline.preview(&form.markdown_input)).await?;

    if state.verbose && result.diagrams_failed > 0 {
        tracing::warn!(
            rendered = result.diagrams_rendered,
            failed = result.diagrams_failed,
            "Preview contains diagram errors"
        );
    }

    Ok(Html(result.html))
}
