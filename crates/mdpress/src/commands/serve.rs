//! `mdpress serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdpress_config::{CliSettings, Config};
use mdpress_pipeline::{Pipeline, ToolAvailability};
use mdpress_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover mdpress.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long, env = "MDPRESS_HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "MDPRESS_PORT")]
    port: Option<u16>,

    /// mermaid-cli executable (overrides config).
    #[arg(long)]
    mmdc: Option<PathBuf>,

    /// pandoc executable (overrides config).
    #[arg(long)]
    pandoc: Option<PathBuf>,

    /// Leave diagram code blocks unrendered.
    #[arg(long)]
    no_diagrams: bool,

    /// Enable verbose output (request traces and diagram warnings).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            mermaid_command: self.mmdc,
            pandoc_command: self.pandoc,
            diagrams_enabled: self.no_diagrams.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        output.info(&format!(
            "Starting server on http://{}:{}",
            config.server.host, config.server.port
        ));

        let tools = ToolAvailability::detect(&config);
        if config.diagrams.enabled {
            output.tool("Diagrams", tools.mermaid.as_deref());
        } else {
            output.info("Diagrams: disabled");
        }
        output.tool("pandoc", tools.pandoc.as_deref());
        output.tool("PDF engine", tools.pdf_engine.as_deref());

        let pipeline = Pipeline::new(&config, tools);
        let server_config = server_config_from_config(&config, self.verbose);
        run_server(server_config, pipeline)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
