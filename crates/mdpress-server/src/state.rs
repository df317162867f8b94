//! Application state.
//!
//! Shared state for all request handlers.

use mdpress_pipeline::Pipeline;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Preview and export pipeline.
    pub(crate) pipeline: Pipeline,
    /// Log per-request diagram statistics.
    pub(crate) verbose: bool,
}
