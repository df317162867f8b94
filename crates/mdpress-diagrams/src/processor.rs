//! Diagram substitution over raw Markdown.
//!
//! Every fenced block tagged `mermaid`, `sequence` or `flowchart` is rendered
//! to PNG and replaced by an inline image reference carrying a base64 data
//! URI. A block that fails to render is replaced by a bold error marker so the
//! rest of the document still renders.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use mdpress_normalize::fenced_blocks;
use rayon::prelude::*;

use crate::language::{DiagramLanguage, ExtractedDiagram};
use crate::renderer::{DiagramError, DiagramRenderer};

/// How diagram blocks of one document are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// One block after another.
    #[default]
    Sequential,
    /// Blocks rendered concurrently on the rayon pool; output order is kept.
    Parallel,
}

/// Result of substituting diagrams in a document.
#[derive(Debug, Default)]
pub struct Substitution {
    /// Markdown with every diagram block replaced.
    pub markdown: String,
    /// Number of diagrams rendered to images.
    pub rendered: usize,
    /// Failure messages for diagrams replaced by an error marker.
    pub warnings: Vec<String>,
}

impl Substitution {
    /// Number of diagrams replaced by an error marker.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.warnings.len()
    }
}

/// Replaces diagram blocks with rendered images.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use mdpress_diagrams::{DiagramError, DiagramProcessor, DiagramRenderer};
///
/// struct Blank;
///
/// impl DiagramRenderer for Blank {
///     fn render_png(&self, _source: &str) -> Result<Vec<u8>, DiagramError> {
///         Ok(vec![0x89, b'P', b'N', b'G'])
///     }
/// }
///
/// let processor = DiagramProcessor::new(Arc::new(Blank));
/// let result = processor.substitute("```mermaid\ngraph TD\n```\n");
/// assert_eq!(result.markdown, "\n![](data:image/png;base64,iVBORw==)\n");
/// ```
#[derive(Clone)]
pub struct DiagramProcessor {
    renderer: Arc<dyn DiagramRenderer>,
    mode: RenderMode,
}

impl DiagramProcessor {
    /// Create a processor that renders sequentially.
    #[must_use]
    pub fn new(renderer: Arc<dyn DiagramRenderer>) -> Self {
        Self {
            renderer,
            mode: RenderMode::default(),
        }
    }

    /// Set the render mode.
    #[must_use]
    pub fn mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace every diagram block in `markdown`.
    ///
    /// Text outside diagram blocks is copied byte for byte. A document
    /// without diagram blocks is returned unchanged and the renderer is never
    /// invoked.
    #[must_use]
    pub fn substitute(&self, markdown: &str) -> Substitution {
        let diagrams = extract_diagrams(markdown);
        if diagrams.is_empty() {
            return Substitution {
                markdown: markdown.to_owned(),
                ..Substitution::default()
            };
        }

        let results: Vec<Result<Vec<u8>, DiagramError>> = match self.mode {
            RenderMode::Sequential => diagrams
                .iter()
                .map(|d| self.renderer.render_png(&d.source))
                .collect(),
            RenderMode::Parallel => diagrams
                .par_iter()
                .map(|d| self.renderer.render_png(&d.source))
                .collect(),
        };

        let mut output = String::with_capacity(markdown.len());
        let mut rendered = 0;
        let mut warnings = Vec::new();
        let mut copied = 0;

        for (diagram, result) in diagrams.iter().zip(results) {
            output.push_str(&markdown[copied..diagram.span.start]);
            match result {
                Ok(png) => {
                    output.push_str(&image_reference(&png));
                    rendered += 1;
                }
                Err(e) => {
                    let message = e.to_string();
                    tracing::warn!(
                        index = diagram.index,
                        language = diagram.language.as_str(),
                        error = %message,
                        "Diagram rendering failed"
                    );
                    output.push_str(&error_marker(&message));
                    warnings.push(format!("diagram {}: {message}", diagram.index));
                }
            }
            copied = diagram.span.end;
        }
        output.push_str(&markdown[copied..]);

        tracing::debug!(rendered, failed = warnings.len(), "Substituted diagrams");

        Substitution {
            markdown: output,
            rendered,
            warnings,
        }
    }
}

/// Collect diagram blocks in document order.
///
/// Fenced blocks with other language tags, and anything that only looks like
/// a fence inside another fenced block, are skipped.
#[must_use]
pub fn extract_diagrams(markdown: &str) -> Vec<ExtractedDiagram> {
    fenced_blocks(markdown)
        .into_iter()
        .filter_map(|block| {
            let language = DiagramLanguage::parse(block.language())?;
            Some((language, block))
        })
        .enumerate()
        .map(|(index, (language, block))| ExtractedDiagram {
            index,
            language,
            source: block.content.trim().to_owned(),
            span: block.span,
        })
        .collect()
}

/// Markdown image reference embedding a PNG as a data URI.
#[must_use]
pub fn image_reference(png: &[u8]) -> String {
    format!("\n![](data:image/png;base64,{})\n", BASE64_STANDARD.encode(png))
}

/// Bold Markdown marker standing in for a diagram that failed to render.
#[must_use]
pub fn error_marker(message: &str) -> String {
    format!("\n**[Diagram Error: {message}]**\n")
}
