//! Export endpoint.

use std::sync::Arc;

use axum::Form;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use mdpress_export::ExportFormat;
use serde::Deserialize;

use crate::error::ServerError;
use crate::handlers::EditorForm;
use crate::state::AppState;

/// Query string for POST /export.
#[derive(Debug, Deserialize)]
pub(crate) struct ExportQuery {
    /// Target type, `docx` when absent.
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Handle POST /export?type={docx|pdf}.
///
/// The type is validated before any file is written.
pub(crate) async fn post_export(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
    Form(form): Form<EditorForm>,
) -> Result<Response, ServerError> {
    let format: ExportFormat = query.kind.as_deref().unwrap_or("docx").parse()?;

    let worker = Arc::clone(&state);
    let document =
        tokio::task::spawn_blocking(move || worker.pipeline.export(&form.markdown_input, format))
            .await??;

    let disposition = format!(r#"attachment; filename="{}""#, document.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, document.content_type().to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}
