//! External tool detection.

use std::path::{Path, PathBuf};

use mdpress_config::Config;
use serde::Serialize;

/// Resolved locations of the external tools the pipeline shells out to.
///
/// Detected once at startup; `None` means the executable was not found.
/// Missing tools do not disable anything: the failure surfaces per request
/// (as a diagram error marker or an export error).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolAvailability {
    pub mermaid: Option<PathBuf>,
    pub pandoc: Option<PathBuf>,
    pub pdf_engine: Option<PathBuf>,
}

impl ToolAvailability {
    /// Look up the configured executables.
    #[must_use]
    pub fn detect(config: &Config) -> Self {
        let tools = Self {
            mermaid: locate(&config.diagrams.command),
            pandoc: locate(&config.export.pandoc),
            pdf_engine: locate(Path::new(&config.export.pdf_engine)),
        };

        if config.diagrams.enabled && tools.mermaid.is_none() {
            tracing::warn!(
                command = %config.diagrams.command.display(),
                "Diagram renderer not found, diagram blocks will show errors"
            );
        }
        if tools.pandoc.is_none() {
            tracing::warn!(
                command = %config.export.pandoc.display(),
                "pandoc not found, export will fail"
            );
        }
        if tools.pdf_engine.is_none() {
            tracing::warn!(
                engine = %config.export.pdf_engine,
                "PDF engine not found, PDF export will fail"
            );
        }

        tools
    }

    /// Availability flags for clients.
    #[must_use]
    pub fn summary(&self) -> ToolSummary {
        ToolSummary {
            mermaid: self.mermaid.is_some(),
            pandoc: self.pandoc.is_some(),
            pdf_engine: self.pdf_engine.is_some(),
        }
    }
}

/// Which tools were found, without their paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSummary {
    pub mermaid: bool,
    pub pandoc: bool,
    pub pdf_engine: bool,
}

fn locate(command: &Path) -> Option<PathBuf> {
    which::which(command).ok()
}
