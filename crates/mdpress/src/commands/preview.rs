//! `mdpress preview` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use mdpress_config::{CliSettings, Config};
use mdpress_pipeline::Pipeline;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the preview command.
#[derive(Args)]
pub(crate) struct PreviewArgs {
    /// Markdown file to render.
    input: PathBuf,

    /// Output file (default: standard output).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mdpress.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Leave diagram code blocks unrendered.
    #[arg(long)]
    no_diagrams: bool,
}

impl PreviewArgs {
    /// Execute the preview command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or a file cannot be read or written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            diagrams_enabled: self.no_diagrams.then_some(false),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let pipeline = Pipeline::from_config(&config);

        let markdown = std::fs::read_to_string(&self.input)?;
        let result = pipeline.preview(&markdown);

        if result.diagrams_failed > 0 {
            output.warning(&format!(
                "{} of {} diagrams failed to render",
                result.diagrams_failed,
                result.diagrams_rendered + result.diagrams_failed
            ));
        }

        match &self.output {
            Some(path) => {
                std::fs::write(path, &result.html)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => std::io::stdout().write_all(result.html.as_bytes())?,
        }

        Ok(())
    }
}
