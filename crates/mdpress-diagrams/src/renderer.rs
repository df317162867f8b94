//! Diagram renderer abstraction and the mermaid-cli implementation.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tempfile::TempDir;

use crate::consts::{DEFAULT_COMMAND, INPUT_FILE, OUTPUT_FILE, SCRATCH_PREFIX};

/// Diagram rendering error.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    #[error("failed to launch {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("{command} failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("renderer produced no image")]
    MissingOutput,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Render(String),
}

/// Renders diagram source text to a PNG image.
pub trait DiagramRenderer: Send + Sync {
    /// Render `source` and return the raw PNG bytes.
    fn render_png(&self, source: &str) -> Result<Vec<u8>, DiagramError>;
}

/// Renderer that shells out to mermaid-cli (`mmdc`).
///
/// Every call works in its own scratch directory holding the diagram source
/// and the rendered image. The directory is removed when the call returns,
/// whatever the outcome.
#[derive(Debug, Clone)]
pub struct MermaidCli {
    command: PathBuf,
    args: Vec<String>,
    work_dir: Option<PathBuf>,
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

impl MermaidCli {
    /// Create a renderer invoking the given executable.
    #[must_use]
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            work_dir: None,
        }
    }

    /// Extra arguments appended after `-i <input> -o <output>`.
    ///
    /// # Example
    ///
    /// ```
    /// use mdpress_diagrams::MermaidCli;
    ///
    /// let renderer = MermaidCli::new("mmdc").args(vec!["-b".to_owned(), "white".to_owned()]);
    /// ```
    #[must_use]
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Parent directory for scratch directories (default: system temp dir).
    #[must_use]
    pub fn work_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.work_dir = dir;
        self
    }

    /// Executable invoked by this renderer.
    #[must_use]
    pub fn command(&self) -> &Path {
        &self.command
    }

    fn scratch_dir(&self) -> io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        match &self.work_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
    }
}

impl DiagramRenderer for MermaidCli {
    fn render_png(&self, source: &str) -> Result<Vec<u8>, DiagramError> {
        let scratch = self.scratch_dir()?;
        let input = scratch.path().join(INPUT_FILE);
        let output = scratch.path().join(OUTPUT_FILE);
        std::fs::write(&input, source)?;

        let command = self.command.display().to_string();
        tracing::debug!(command = %command, "Rendering diagram");

        let result = Command::new(&self.command)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| DiagramError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(DiagramError::Failed {
                command,
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_owned(),
            });
        }

        std::fs::read(&output).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DiagramError::MissingOutput,
            _ => DiagramError::Io(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_missing_executable_is_spawn_error_and_cleans_up() {
        let work = tempfile::tempdir().unwrap();
        let renderer = MermaidCli::new("mdpress-no-such-renderer")
            .work_dir(Some(work.path().to_path_buf()));

        let err = renderer.render_png("graph TD\nA-->B").unwrap_err();

        assert!(matches!(err, DiagramError::Spawn { .. }), "got {err:?}");
        assert!(err.to_string().contains("mdpress-no-such-renderer"));
        assert_eq!(entries(work.path()), 0);
    }

    #[test]
    fn test_missing_work_dir_is_io_error() {
        let renderer = MermaidCli::new("mmdc")
            .work_dir(Some(PathBuf::from("/nonexistent/mdpress/work")));

        let err = renderer.render_png("graph TD").unwrap_err();
        assert!(matches!(err, DiagramError::Io(_)), "got {err:?}");
    }

    #[test]
    fn test_default_command() {
        assert_eq!(MermaidCli::default().command(), Path::new("mmdc"));
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_render_returns_output_and_cleans_up() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        // Arguments: -i <input> -o <output>
        let script = write_script(bin.path(), "fake-mmdc", r#"cp "$2" "$4""#);
        let renderer = MermaidCli::new(script).work_dir(Some(work.path().to_path_buf()));

        let bytes = renderer.render_png("graph TD\nA-->B").unwrap();

        assert_eq!(bytes, b"graph TD\nA-->B");
        assert_eq!(entries(work.path()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_extra_args_are_passed() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let script = write_script(bin.path(), "fake-mmdc", r#"printf '%s' "$5 $6" > "$4""#);
        let renderer = MermaidCli::new(script)
            .args(vec!["-b".to_owned(), "white".to_owned()])
            .work_dir(Some(work.path().to_path_buf()));

        assert_eq!(renderer.render_png("A").unwrap(), b"-b white");
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_render_reports_stderr_and_cleans_up() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let script = write_script(bin.path(), "fake-mmdc", "echo 'Parse error on line 1' >&2\nexit 3");
        let renderer = MermaidCli::new(script).work_dir(Some(work.path().to_path_buf()));

        let err = renderer.render_png("not a diagram").unwrap_err();

        match &err {
            DiagramError::Failed { stderr, status, .. } => {
                assert_eq!(stderr, "Parse error on line 1");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(err.to_string().contains("Parse error on line 1"));
        assert_eq!(entries(work.path()), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_no_output_file_is_missing_output() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let script = write_script(bin.path(), "fake-mmdc", "exit 0");
        let renderer = MermaidCli::new(script).work_dir(Some(work.path().to_path_buf()));

        let err = renderer.render_png("A").unwrap_err();

        assert!(matches!(err, DiagramError::MissingOutput), "got {err:?}");
        assert_eq!(entries(work.path()), 0);
    }
}
