//! Export orchestration.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use mdpress_normalize::prepare_for_export;
use tempfile::TempDir;

use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::pandoc::DocumentConverter;

const INPUT_FILE: &str = "input.md";
const SCRATCH_PREFIX: &str = "mdpress-export-";

/// A converted document ready for download.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        self.format.file_name()
    }
}

/// Runs prepared Markdown through a [`DocumentConverter`].
///
/// Each export gets its own scratch directory holding `input.md` and the
/// converter output. The directory is removed before `export` returns, on
/// success and on every error path.
#[derive(Clone)]
pub struct Exporter {
    converter: Arc<dyn DocumentConverter>,
    temp_dir: Option<PathBuf>,
}

impl Exporter {
    #[must_use]
    pub fn new(converter: Arc<dyn DocumentConverter>) -> Self {
        Self {
            converter,
            temp_dir: None,
        }
    }

    /// Parent directory for scratch directories (default: system temp dir).
    #[must_use]
    pub fn temp_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.temp_dir = dir;
        self
    }

    /// Prepare `markdown` for export and convert it to `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch directory cannot be used, the
    /// converter fails, or it produces no output file.
    pub fn export(&self, markdown: &str, format: ExportFormat) -> Result<ExportedDocument, ExportError> {
        let prepared = prepare_for_export(markdown);

        let scratch = self.scratch_dir()?;
        let input = scratch.path().join(INPUT_FILE);
        let output = scratch.path().join(format.file_name());
        std::fs::write(&input, prepared)?;

        self.converter.convert(&input, &output, format)?;

        let bytes = std::fs::read(&output).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ExportError::MissingOutput,
            _ => ExportError::Io(e),
        })?;

        tracing::info!(%format, size = bytes.len(), "Exported document");
        Ok(ExportedDocument { format, bytes })
    }

    fn scratch_dir(&self) -> io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        match &self.temp_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use super::*;
    use pretty_assertions::assert_eq;

    /// Copies the input file to the output file and records the call.
    #[derive(Default)]
    struct CopyConverter {
        calls: Mutex<Vec<(PathBuf, ExportFormat)>>,
    }

    impl DocumentConverter for CopyConverter {
        fn convert(&self, input: &Path, output: &Path, format: ExportFormat) -> Result<(), ExportError> {
            self.calls.lock().unwrap().push((output.to_path_buf(), format));
            std::fs::copy(input, output)?;
            Ok(())
        }
    }

    struct FailingConverter;

    impl DocumentConverter for FailingConverter {
        fn convert(&self, input: &Path, output: &Path, _format: ExportFormat) -> Result<(), ExportError> {
            assert!(input.exists());
            std::fs::write(output, b"partial")?;
            Err(ExportError::Conversion("! LaTeX Error: File `ctex.sty' not found.".to_owned()))
        }
    }

    struct SilentConverter;

    impl DocumentConverter for SilentConverter {
        fn convert(&self, _: &Path, _: &Path, _: ExportFormat) -> Result<(), ExportError> {
            Ok(())
        }
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_export_converts_prepared_markdown() {
        let work = tempfile::tempdir().unwrap();
        let converter = Arc::new(CopyConverter::default());
        let exporter = Exporter::new(Arc::clone(&converter) as Arc<dyn DocumentConverter>)
            .temp_dir(Some(work.path().to_path_buf()));

        let doc = exporter.export(r"Energy \( E \) and \[ x \]", ExportFormat::Docx).unwrap();

        assert_eq!(String::from_utf8(doc.bytes.clone()).unwrap(), "Energy $E$ and\n\n$$ x $$\n");
        assert_eq!(doc.file_name(), "output.docx");
        assert_eq!(doc.content_type(), ExportFormat::Docx.content_type());

        let calls = converter.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.file_name().unwrap(), "output.docx");
        assert_eq!(calls[0].1, ExportFormat::Docx);
        assert_eq!(entries(work.path()), 0);
    }

    #[test]
    fn test_conversion_failure_cleans_up() {
        let work = tempfile::tempdir().unwrap();
        let exporter =
            Exporter::new(Arc::new(FailingConverter)).temp_dir(Some(work.path().to_path_buf()));

        let err = exporter.export("# Title", ExportFormat::Pdf).unwrap_err();

        assert!(err.to_string().contains("ctex.sty"));
        assert_eq!(entries(work.path()), 0);
    }

    #[test]
    fn test_missing_output() {
        let work = tempfile::tempdir().unwrap();
        let exporter =
            Exporter::new(Arc::new(SilentConverter)).temp_dir(Some(work.path().to_path_buf()));

        let err = exporter.export("text", ExportFormat::Pdf).unwrap_err();

        assert!(matches!(err, ExportError::MissingOutput), "got {err:?}");
        assert_eq!(entries(work.path()), 0);
    }

    #[test]
    fn test_unusable_temp_dir() {
        let exporter = Exporter::new(Arc::new(SilentConverter))
            .temp_dir(Some(PathBuf::from("/nonexistent/mdpress/tmp")));

        let err = exporter.export("text", ExportFormat::Docx).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)), "got {err:?}");
    }
}
