//! Internal constants for diagram rendering.

/// Default mermaid-cli executable.
pub const DEFAULT_COMMAND: &str = "mmdc";

/// Diagram source file name inside the scratch directory.
pub const INPUT_FILE: &str = "diagram.mmd";

/// Rendered image file name inside the scratch directory.
pub const OUTPUT_FILE: &str = "diagram.png";

/// Prefix for per-diagram scratch directories.
pub const SCRATCH_PREFIX: &str = "mdpress-diagram-";
