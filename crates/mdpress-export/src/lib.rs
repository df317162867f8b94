//! DOCX and PDF export for mdpress.
//!
//! The export path starts again from the raw editor text: math delimiters are
//! rewritten into pandoc's dialect (see
//! [`mdpress_normalize::prepare_for_export`]), the result is written to a
//! scratch directory and handed to a [`DocumentConverter`], normally
//! [`Pandoc`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mdpress_export::{ExportFormat, Exporter, Pandoc};
//!
//! let exporter = Exporter::new(Arc::new(Pandoc::new("pandoc")));
//! let format: ExportFormat = "pdf".parse()?;
//! let document = exporter.export("# Report\n\n\\(a^2 + b^2\\)", format)?;
//! std::fs::write(document.file_name(), &document.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod exporter;
mod format;
mod pandoc;

pub use error::ExportError;
pub use exporter::{ExportedDocument, Exporter};
pub use format::ExportFormat;
pub use pandoc::{
    DEFAULT_HIGHLIGHT_STYLE, DEFAULT_INPUT_FORMAT, DEFAULT_LUA_FILTER, DEFAULT_MAIN_FONT,
    DEFAULT_PDF_ENGINE, DEFAULT_REFERENCE_DOC, DocumentConverter, Pandoc,
};
