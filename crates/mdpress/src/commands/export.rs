//! `mdpress export` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdpress_config::{CliSettings, Config};
use mdpress_export::ExportFormat;
use mdpress_pipeline::Pipeline;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    /// Markdown file to convert.
    input: PathBuf,

    /// Target format: docx or pdf.
    #[arg(short = 't', long = "type", default_value = "docx")]
    format: String,

    /// Output file (default: input name with the format's extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mdpress.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// pandoc executable (overrides config).
    #[arg(long)]
    pandoc: Option<PathBuf>,
}

impl ExportArgs {
    /// Execute the export command.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is unknown, configuration fails, or the
    /// conversion fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let format: ExportFormat = self.format.parse()?;

        let cli_settings = CliSettings {
            pandoc_command: self.pandoc,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let pipeline = Pipeline::from_config(&config);

        let markdown = std::fs::read_to_string(&self.input)?;
        output.info(&format!("Converting {}...", self.input.display()));
        let document = pipeline.export(&markdown, format)?;

        let target = self
            .output
            .unwrap_or_else(|| default_output(&self.input, format));
        std::fs::write(&target, &document.bytes)?;
        tracing::debug!(format = %format, bytes = document.bytes.len(), "Wrote document");
        output.success(&format!("Wrote {}", target.display()));

        Ok(())
    }
}

/// Input path with its extension replaced by the format's.
fn default_output(input: &Path, format: ExportFormat) -> PathBuf {
    input.with_extension(format.extension())
}
