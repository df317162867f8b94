//! Configuration management for mdpress.
//!
//! Parses `mdpress.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `diagrams.command`
//! - `export.pandoc`
//! - `export.reference_doc`
//! - `export.lua_filter`
//! - `runtime.temp_dir`
//!
//! ## Example
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8055
//!
//! [diagrams]
//! command = "./node_modules/.bin/mmdc"
//! args = ["-b", "white"]
//! parallel = true
//!
//! [export]
//! pdf_engine = "xelatex"
//! main_font = "Noto Sans CJK SC"
//! reference_doc = "templates/reference.docx"
//! ```
//!
//! When `reference_doc` or `lua_filter` is not set, `reference.docx` and
//! `mermaid_filter.lua` are used if they exist next to the config file or in
//! the current directory.

mod expand;

use std::path::{Component, Path, PathBuf};

use mdpress_export::{
    DEFAULT_HIGHLIGHT_STYLE, DEFAULT_INPUT_FORMAT, DEFAULT_LUA_FILTER, DEFAULT_MAIN_FONT,
    DEFAULT_PDF_ENGINE, DEFAULT_REFERENCE_DOC,
};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the mermaid-cli executable.
    pub mermaid_command: Option<PathBuf>,
    /// Override the pandoc executable.
    pub pandoc_command: Option<PathBuf>,
    /// Override the diagrams enabled flag.
    pub diagrams_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdpress.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Diagram rendering configuration.
    pub diagrams: DiagramsConfig,
    /// Document export configuration.
    pub export: ExportConfig,
    /// Scratch file configuration.
    pub runtime: RuntimeConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8055,
        }
    }
}

/// Diagram rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Whether diagram blocks are rendered at all.
    pub enabled: bool,
    /// mermaid-cli executable.
    pub command: PathBuf,
    /// Extra arguments passed after `-i <in> -o <out>`.
    pub args: Vec<String>,
    /// Render the diagrams of one document concurrently.
    pub parallel: bool,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: PathBuf::from("mmdc"),
            args: Vec::new(),
            parallel: false,
        }
    }
}

/// Document export configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// pandoc executable.
    pub pandoc: PathBuf,
    /// pandoc `--from` value.
    pub input_format: String,
    /// LaTeX engine for PDF output.
    pub pdf_engine: String,
    /// Main font for PDF output.
    pub main_font: String,
    /// Syntax highlighting style.
    pub highlight_style: String,
    /// Styling template for DOCX output.
    pub reference_doc: Option<PathBuf>,
    /// Lua filter applied to every export.
    pub lua_filter: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pandoc: PathBuf::from("pandoc"),
            input_format: DEFAULT_INPUT_FORMAT.to_owned(),
            pdf_engine: DEFAULT_PDF_ENGINE.to_owned(),
            main_font: DEFAULT_MAIN_FONT.to_owned(),
            highlight_style: DEFAULT_HIGHLIGHT_STYLE.to_owned(),
            reference_doc: None,
            lua_filter: None,
        }
    }
}

/// Scratch file configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Parent directory for scratch directories (system temp dir if unset).
    pub temp_dir: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`export.pandoc`").
        field: String,
        /// Error message (e.g., "${`PANDOC`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require an optional file path to point at an existing file.
fn require_file(path: Option<&Path>, field: &str) -> Result<(), ConfigError> {
    match path {
        Some(path) if !path.is_file() => Err(ConfigError::Validation(format!(
            "{field} not found: {}",
            path.display()
        ))),
        _ => Ok(()),
    }
}

/// Resolve `path` against `base` unless it is absolute or a bare command name.
///
/// Bare names like `pandoc` are looked up in `PATH` by the OS; anything with a
/// directory component (`./bin/mmdc`, `tools/pandoc`) is a file path.
fn resolve_command(base: &Path, path: &Path) -> PathBuf {
    let bare = path.components().count() == 1
        && matches!(path.components().next(), Some(Component::Normal(_)));
    if bare || path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdpress.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        let mut asset_dirs = Vec::new();
        if let Some(dir) = config.config_path.as_deref().and_then(Path::parent) {
            asset_dirs.push(dir.to_path_buf());
        }
        if let Ok(cwd) = std::env::current_dir() {
            asset_dirs.push(cwd);
        }
        config.discover_export_assets(&asset_dirs);

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(command) = &settings.mermaid_command {
            self.diagrams.command.clone_from(command);
        }
        if let Some(command) = &settings.pandoc_command {
            self.export.pandoc.clone_from(command);
        }
        if let Some(enabled) = settings.diagrams_enabled {
            self.diagrams.enabled = enabled;
        }
    }

    /// Fill unset `reference_doc` and `lua_filter` from well-known file names.
    ///
    /// The first directory holding the file wins.
    fn discover_export_assets(&mut self, dirs: &[PathBuf]) {
        let find = |name: &str| {
            dirs.iter()
                .map(|dir| dir.join(name))
                .find(|candidate| candidate.is_file())
        };
        if self.export.reference_doc.is_none() {
            self.export.reference_doc = find(DEFAULT_REFERENCE_DOC);
        }
        if self.export.lua_filter.is_none() {
            self.export.lua_filter = find(DEFAULT_LUA_FILTER);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_diagrams()?;
        self.validate_export()?;
        self.validate_runtime()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 lets the OS pick, which is never what a config file means
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_diagrams(&self) -> Result<(), ConfigError> {
        if self.diagrams.enabled {
            require_non_empty(&self.diagrams.command.to_string_lossy(), "diagrams.command")?;
        }
        Ok(())
    }

    fn validate_export(&self) -> Result<(), ConfigError> {
        let export = &self.export;
        require_non_empty(&export.pandoc.to_string_lossy(), "export.pandoc")?;
        require_non_empty(&export.input_format, "export.input_format")?;
        require_non_empty(&export.pdf_engine, "export.pdf_engine")?;
        require_non_empty(&export.main_font, "export.main_font")?;
        require_non_empty(&export.highlight_style, "export.highlight_style")?;
        require_file(export.reference_doc.as_deref(), "export.reference_doc")?;
        require_file(export.lua_filter.as_deref(), "export.lua_filter")?;
        Ok(())
    }

    fn validate_runtime(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.runtime.temp_dir
            && !dir.is_dir()
        {
            return Err(ConfigError::Validation(format!(
                "runtime.temp_dir is not a directory: {}",
                dir.display()
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.diagrams.command = expand::expand_path(&self.diagrams.command, "diagrams.command")?;
        self.export.pandoc = expand::expand_path(&self.export.pandoc, "export.pandoc")?;

        if let Some(ref path) = self.export.reference_doc {
            self.export.reference_doc = Some(expand::expand_path(path, "export.reference_doc")?);
        }
        if let Some(ref path) = self.export.lua_filter {
            self.export.lua_filter = Some(expand::expand_path(path, "export.lua_filter")?);
        }
        if let Some(ref path) = self.runtime.temp_dir {
            self.runtime.temp_dir = Some(expand::expand_path(path, "runtime.temp_dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.diagrams.command = resolve_command(config_dir, &self.diagrams.command);
        self.export.pandoc = resolve_command(config_dir, &self.export.pandoc);

        let resolve = |path: &mut Option<PathBuf>| {
            if let Some(p) = path.as_mut()
                && p.is_relative()
            {
                *p = config_dir.join(&*p);
            }
        };
        resolve(&mut self.export.reference_doc);
        resolve(&mut self.export.lua_filter);
        resolve(&mut self.runtime.temp_dir);
    }
}
