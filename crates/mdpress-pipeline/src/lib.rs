//! Preview and export pipeline for mdpress.
//!
//! [`Pipeline`] is built once from [`Config`] and the detected
//! [`ToolAvailability`], then shared by every request. It holds no mutable
//! state; each call works on its own input and scratch files.
//!
//! - Preview: normalize block math, substitute diagrams, render HTML.
//! - Export: re-map math for pandoc, convert in a scratch directory.
//!
//! # Example
//!
//! ```no_run
//! use mdpress_config::Config;
//! use mdpress_export::ExportFormat;
//! use mdpress_pipeline::Pipeline;
//!
//! let config = Config::load(None, None)?;
//! let pipeline = Pipeline::from_config(&config);
//!
//! let preview = pipeline.preview("# Notes\n\n\\(e^{i\\pi} + 1 = 0\\)");
//! println!("{}", preview.html);
//!
//! let document = pipeline.export("# Notes", ExportFormat::Pdf)?;
//! std::fs::write(document.file_name(), &document.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod tools;

use std::sync::Arc;

use mdpress_config::Config;
use mdpress_diagrams::{DiagramProcessor, DiagramRenderer, MermaidCli, RenderMode};
use mdpress_export::{DocumentConverter, ExportError, ExportFormat, ExportedDocument, Exporter, Pandoc};
use mdpress_normalize::normalize_block_math;
use mdpress_renderer::PreviewRenderer;
use serde::Serialize;

pub use tools::{ToolAvailability, ToolSummary};

/// Rendered preview of one document.
#[derive(Debug, Clone)]
pub struct PreviewResult {
    /// HTML fragment for the preview pane.
    pub html: String,
    /// Diagrams rendered to images.
    pub diagrams_rendered: usize,
    /// Diagrams replaced by an error marker.
    pub diagrams_failed: usize,
}

/// What the running pipeline can do, as reported to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub diagrams_enabled: bool,
    pub export_formats: Vec<&'static str>,
    pub tools: ToolSummary,
}

/// Shared preview and export pipeline.
#[derive(Clone)]
pub struct Pipeline {
    diagrams: Option<DiagramProcessor>,
    renderer: PreviewRenderer,
    exporter: Exporter,
    tools: ToolAvailability,
}

impl Pipeline {
    /// Build a pipeline, detecting external tools on `PATH`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, ToolAvailability::detect(config))
    }

    /// Build a pipeline with mermaid-cli and pandoc as configured.
    #[must_use]
    pub fn new(config: &Config, tools: ToolAvailability) -> Self {
        let mermaid = MermaidCli::new(&config.diagrams.command)
            .args(config.diagrams.args.clone())
            .work_dir(config.runtime.temp_dir.clone());
        let pandoc = Pandoc::new(&config.export.pandoc)
            .input_format(&config.export.input_format)
            .pdf_engine(&config.export.pdf_engine)
            .main_font(&config.export.main_font)
            .highlight_style(&config.export.highlight_style)
            .reference_doc(config.export.reference_doc.clone())
            .lua_filter(config.export.lua_filter.clone());

        Self::with_collaborators(config, tools, Arc::new(mermaid), Arc::new(pandoc))
    }

    /// Build a pipeline around explicit renderer and converter implementations.
    #[must_use]
    pub fn with_collaborators(
        config: &Config,
        tools: ToolAvailability,
        diagram_renderer: Arc<dyn DiagramRenderer>,
        converter: Arc<dyn DocumentConverter>,
    ) -> Self {
        let mode = if config.diagrams.parallel {
            RenderMode::Parallel
        } else {
            RenderMode::Sequential
        };
        let diagrams = config
            .diagrams
            .enabled
            .then(|| DiagramProcessor::new(diagram_renderer).mode(mode));
        let exporter = Exporter::new(converter).temp_dir(config.runtime.temp_dir.clone());

        Self {
            diagrams,
            renderer: PreviewRenderer::new(),
            exporter,
            tools,
        }
    }

    /// Render `markdown` for the preview pane.
    ///
    /// Never fails: diagram errors are reported inline in the HTML.
    #[must_use]
    pub fn preview(&self, markdown: &str) -> PreviewResult {
        let normalized = normalize_block_math(markdown);

        let (text, diagrams_rendered, diagrams_failed) = match &self.diagrams {
            Some(processor) => {
                let result = processor.substitute(&normalized);
                let failed = result.failed();
                (result.markdown, result.rendered, failed)
            }
            None => (normalized, 0, 0),
        };

        let html = self.renderer.render(&text);
        tracing::debug!(
            input = markdown.len(),
            output = html.len(),
            diagrams_rendered,
            diagrams_failed,
            "Rendered preview"
        );

        PreviewResult {
            html,
            diagrams_rendered,
            diagrams_failed,
        }
    }

    /// Convert `markdown` into a downloadable document.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion fails; scratch files are already
    /// removed when it is returned.
    pub fn export(&self, markdown: &str, format: ExportFormat) -> Result<ExportedDocument, ExportError> {
        self.exporter.export(markdown, format)
    }

    /// Report enabled features and detected tools.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            diagrams_enabled: self.diagrams.is_some(),
            export_formats: ExportFormat::ALL.iter().map(|f| f.extension()).collect(),
            tools: self.tools.summary(),
        }
    }
}
