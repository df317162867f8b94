//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mdpress_export::ExportError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Export failed (bad request or conversion error).
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Blocking worker panicked or was cancelled.
    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            Self::Export(ExportError::UnsupportedFormat(_)) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            Self::Export(e) => {
                tracing::error!(error = %e, "Export failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(json!({"error": e.to_string()})),
                )
                    .into_response()
            }
            Self::Task(e) => {
                tracing::error!(error = %e, "Worker task failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(json!({"error": e.to_string()})),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_is_bad_request() {
        let response =
            ServerError::from(ExportError::UnsupportedFormat("xml".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conversion_error_is_internal() {
        let response =
            ServerError::from(ExportError::Conversion("boom".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
