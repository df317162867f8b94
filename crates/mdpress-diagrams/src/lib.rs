//! Diagram rendering for mdpress.
//!
//! Fenced blocks tagged `mermaid`, `sequence` or `flowchart` are rendered to
//! PNG by mermaid-cli and substituted back into the Markdown as inline images
//! with base64 data URIs. The substituted Markdown then flows through the
//! normal preview pipeline like any other document.
//!
//! # Architecture
//!
//! - [`DiagramRenderer`]: source-to-PNG seam, implemented by [`MermaidCli`]
//! - [`DiagramProcessor`]: finds diagram blocks and splices in the results
//! - [`DiagramLanguage`]: recognized fence tags
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mdpress_diagrams::{DiagramProcessor, MermaidCli, RenderMode};
//!
//! let processor = DiagramProcessor::new(Arc::new(MermaidCli::new("mmdc")))
//!     .mode(RenderMode::Parallel);
//! let result = processor.substitute("```mermaid\ngraph TD\n  A-->B\n```\n");
//! println!("{} rendered, {} failed", result.rendered, result.failed());
//! ```

mod consts;
mod language;
mod processor;
mod renderer;

pub use consts::DEFAULT_COMMAND;
pub use language::{DiagramLanguage, ExtractedDiagram};
pub use processor::{
    DiagramProcessor, RenderMode, Substitution, error_marker, extract_diagrams, image_reference,
};
pub use renderer::{DiagramError, DiagramRenderer, MermaidCli};
