//! HTTP request handlers.

use serde::Deserialize;

pub(crate) mod config;
pub(crate) mod editor;
pub(crate) mod export;
pub(crate) mod preview;

/// Form body posted by the editor page.
#[derive(Debug, Deserialize)]
pub(crate) struct EditorForm {
    /// Raw Markdown; a missing field is treated as an empty document.
    #[serde(default)]
    pub(crate) markdown_input: String,
}
