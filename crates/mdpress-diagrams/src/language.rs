//! Diagram languages recognized in fenced code blocks.

/// Supported diagram languages.
///
/// All of them are rendered by mermaid-cli; the tag only decides whether a
/// fenced block is a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramLanguage {
    Mermaid,
    Sequence,
    Flowchart,
}

impl DiagramLanguage {
    /// Parse language from a code fence language tag.
    ///
    /// Returns None if the tag is not a supported diagram type.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mermaid" => Some(Self::Mermaid),
            "sequence" => Some(Self::Sequence),
            "flowchart" => Some(Self::Flowchart),
            _ => None,
        }
    }

    /// Fence tag for this language.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mermaid => "mermaid",
            Self::Sequence => "sequence",
            Self::Flowchart => "flowchart",
        }
    }
}

/// A diagram block extracted from a document.
#[derive(Debug)]
pub struct ExtractedDiagram {
    /// Zero-based index of this diagram in the document.
    pub index: usize,
    /// Diagram language from the fence tag.
    pub language: DiagramLanguage,
    /// Trimmed diagram source.
    pub source: String,
    /// Byte range of the whole fenced block in the document.
    pub span: std::ops::Range<usize>,
}
