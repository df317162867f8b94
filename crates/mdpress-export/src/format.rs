//! Export target formats.

use std::fmt;
use std::str::FromStr;

use crate::error::ExportError;

/// Document type produced by export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Docx,
    Pdf,
}

impl ExportFormat {
    /// All supported formats, in the order they are offered to users.
    pub const ALL: [Self; 2] = [Self::Docx, Self::Pdf];

    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }

    /// MIME type of the produced document.
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Pdf => "application/pdf",
        }
    }

    /// File name offered for download (`output.docx`, `output.pdf`).
    #[must_use]
    pub fn file_name(self) -> String {
        format!("output.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    /// Parse exactly `docx` or `pdf`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "docx" => Ok(Self::Docx),
            "pdf" => Ok(Self::Pdf),
            other => Err(ExportError::UnsupportedFormat(other.to_owned())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
