//! Export error type.

use std::io;

/// Error returned by document export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Requested export type is not `docx` or `pdf`.
    #[error("Unsupported export type: {0}")]
    UnsupportedFormat(String),
    /// Converter executable could not be started.
    #[error("failed to launch {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    /// Converter ran and reported an error.
    #[error("document conversion failed: {0}")]
    Conversion(String),
    /// Converter finished without writing the output file.
    #[error("converter produced no output file")]
    MissingOutput,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
