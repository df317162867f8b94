//! Document converter abstraction and the pandoc implementation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::ExportError;
use crate::format::ExportFormat;

/// Default pandoc input format: Markdown with raw TeX and both math dialects.
pub const DEFAULT_INPUT_FORMAT: &str = "markdown+raw_tex+tex_math_dollars+tex_math_double_backslash";

/// Default LaTeX engine for PDF output.
pub const DEFAULT_PDF_ENGINE: &str = "xelatex";

/// Default main font for PDF output; covers CJK text.
pub const DEFAULT_MAIN_FONT: &str = "Noto Sans CJK SC";

/// Default syntax highlighting style.
pub const DEFAULT_HIGHLIGHT_STYLE: &str = "pygments";

/// DOCX styling template picked up when present.
pub const DEFAULT_REFERENCE_DOC: &str = "reference.docx";

/// Lua filter picked up when present.
pub const DEFAULT_LUA_FILTER: &str = "mermaid_filter.lua";

/// Converts a prepared Markdown file into a document.
pub trait DocumentConverter: Send + Sync {
    /// Convert `input` into `output` as `format`.
    fn convert(&self, input: &Path, output: &Path, format: ExportFormat) -> Result<(), ExportError>;
}

/// Converter that shells out to pandoc.
#[derive(Debug, Clone)]
pub struct Pandoc {
    command: PathBuf,
    input_format: String,
    pdf_engine: String,
    main_font: String,
    highlight_style: String,
    reference_doc: Option<PathBuf>,
    lua_filter: Option<PathBuf>,
}

impl Default for Pandoc {
    fn default() -> Self {
        Self::new("pandoc")
    }
}

impl Pandoc {
    /// Create a converter invoking the given executable with default options.
    #[must_use]
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            input_format: DEFAULT_INPUT_FORMAT.to_owned(),
            pdf_engine: DEFAULT_PDF_ENGINE.to_owned(),
            main_font: DEFAULT_MAIN_FONT.to_owned(),
            highlight_style: DEFAULT_HIGHLIGHT_STYLE.to_owned(),
            reference_doc: None,
            lua_filter: None,
        }
    }

    #[must_use]
    pub fn input_format(mut self, format: impl Into<String>) -> Self {
        self.input_format = format.into();
        self
    }

    #[must_use]
    pub fn pdf_engine(mut self, engine: impl Into<String>) -> Self {
        self.pdf_engine = engine.into();
        self
    }

    #[must_use]
    pub fn main_font(mut self, font: impl Into<String>) -> Self {
        self.main_font = font.into();
        self
    }

    #[must_use]
    pub fn highlight_style(mut self, style: impl Into<String>) -> Self {
        self.highlight_style = style.into();
        self
    }

    /// Styling template for DOCX output.
    #[must_use]
    pub fn reference_doc(mut self, path: Option<PathBuf>) -> Self {
        self.reference_doc = path;
        self
    }

    /// Lua filter applied to both formats (e.g. a diagram filter).
    #[must_use]
    pub fn lua_filter(mut self, path: Option<PathBuf>) -> Self {
        self.lua_filter = path;
        self
    }

    /// Executable invoked by this converter.
    #[must_use]
    pub fn command(&self) -> &Path {
        &self.command
    }

    /// Command-line arguments for one conversion.
    ///
    /// `<in> --from <fmt> [--to docx] --output <out> <format options>`
    #[must_use]
    pub fn args(&self, input: &Path, output: &Path, format: ExportFormat) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            input.into(),
            "--from".into(),
            self.input_format.as_str().into(),
        ];
        if format == ExportFormat::Docx {
            args.push("--to".into());
            args.push("docx".into());
        }
        args.push("--output".into());
        args.push(output.into());

        match format {
            ExportFormat::Pdf => {
                args.push(format!("--pdf-engine={}", self.pdf_engine).into());
                args.push("-V".into());
                args.push(format!("mainfont={}", self.main_font).into());
                args.push(format!("--highlight-style={}", self.highlight_style).into());
            }
            ExportFormat::Docx => {
                args.push(format!("--highlight-style={}", self.highlight_style).into());
                if let Some(reference) = &self.reference_doc {
                    args.push(flag_with_path("--reference-doc=", reference));
                }
            }
        }

        if let Some(filter) = &self.lua_filter {
            args.push(flag_with_path("--lua-filter=", filter));
        }

        args
    }
}

fn flag_with_path(flag: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(path);
    arg
}

impl DocumentConverter for Pandoc {
    fn convert(&self, input: &Path, output: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let command = self.command.display().to_string();
        tracing::debug!(command = %command, %format, "Running document converter");

        let result = Command::new(&self.command)
            .args(self.args(input, output, format))
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ExportError::Spawn {
                command: command.clone(),
                source,
            })?;

        if result.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&result.stderr).trim().to_owned();
        let message = if stderr.is_empty() {
            format!("{command} exited with {}", result.status)
        } else {
            stderr
        };
        Err(ExportError::Conversion(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_pdf_args() {
        let args = Pandoc::default().args(Path::new("in.md"), Path::new("out.pdf"), ExportFormat::Pdf);

        assert_eq!(
            strings(args),
            vec![
                "in.md",
                "--from",
                DEFAULT_INPUT_FORMAT,
                "--output",
                "out.pdf",
                "--pdf-engine=xelatex",
                "-V",
                "mainfont=Noto Sans CJK SC",
                "--highlight-style=pygments",
            ]
        );
    }

    #[test]
    fn test_docx_args() {
        let args =
            Pandoc::default().args(Path::new("in.md"), Path::new("out.docx"), ExportFormat::Docx);

        assert_eq!(
            strings(args),
            vec![
                "in.md",
                "--from",
                DEFAULT_INPUT_FORMAT,
                "--to",
                "docx",
                "--output",
                "out.docx",
                "--highlight-style=pygments",
            ]
        );
    }

    #[test]
    fn test_optional_args() {
        let pandoc = Pandoc::new("pandoc")
            .pdf_engine("lualatex")
            .main_font("DejaVu Sans")
            .highlight_style("tango")
            .reference_doc(Some(PathBuf::from("/tpl/ref.docx")))
            .lua_filter(Some(PathBuf::from("/filters/diagram.lua")));

        let docx = strings(pandoc.args(Path::new("a"), Path::new("b"), ExportFormat::Docx));
        assert!(docx.contains(&"--highlight-style=tango".to_owned()));
        assert!(docx.contains(&"--reference-doc=/tpl/ref.docx".to_owned()));
        assert_eq!(docx.last().unwrap(), "--lua-filter=/filters/diagram.lua");

        let pdf = strings(pandoc.args(Path::new("a"), Path::new("b"), ExportFormat::Pdf));
        assert!(pdf.contains(&"--pdf-engine=lualatex".to_owned()));
        assert!(pdf.contains(&"mainfont=DejaVu Sans".to_owned()));
        assert!(!pdf.iter().any(|a| a.starts_with("--reference-doc")));
        assert_eq!(pdf.last().unwrap(), "--lua-filter=/filters/diagram.lua");
    }

    #[test]
    fn test_docx_args_with_default_template_and_filter() {
        let pandoc = Pandoc::default()
            .reference_doc(Some(PathBuf::from(DEFAULT_REFERENCE_DOC)))
            .lua_filter(Some(PathBuf::from(DEFAULT_LUA_FILTER)));

        let args = strings(pandoc.args(Path::new("in.md"), Path::new("out.docx"), ExportFormat::Docx));

        assert_eq!(
            args[7..].to_vec(),
            vec![
                "--highlight-style=pygments",
                "--reference-doc=reference.docx",
                "--lua-filter=mermaid_filter.lua",
            ]
        );
    }

    #[test]
    fn test_missing_executable_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Pandoc::new("mdpress-no-such-pandoc")
            .convert(
                &dir.path().join("in.md"),
                &dir.path().join("out.pdf"),
                ExportFormat::Pdf,
            )
            .unwrap_err();

        assert!(matches!(err, ExportError::Spawn { .. }), "got {err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_carries_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-pandoc");
        std::fs::write(&script, "#!/bin/sh\necho 'xelatex not found' >&2\nexit 43\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = Pandoc::new(&script)
            .convert(
                &dir.path().join("in.md"),
                &dir.path().join("out.pdf"),
                ExportFormat::Pdf,
            )
            .unwrap_err();

        match err {
            ExportError::Conversion(message) => assert_eq!(message, "xelatex not found"),
            other => panic!("expected Conversion, got {other:?}"),
        }
    }
}
