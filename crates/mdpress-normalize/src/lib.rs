//! Text normalization for mdpress.
//!
//! Pure text-to-text transformations applied to raw Markdown before it is
//! handed to an external renderer:
//!
//! - [`lex`]: single-pass delimiter lexer (block math, inline math, code)
//! - [`normalize_block_math`]: isolate `\[ ... \]` with blank lines
//! - [`prepare_for_export`]: rewrite math delimiters into pandoc's dialect
//!
//! All passes work on lexer tokens rather than chained regular expressions,
//! so spans never overlap and normalization is idempotent. Math inside fenced
//! code blocks and inline code spans is never rewritten.
//!
//! # Example
//!
//! ```
//! use mdpress_normalize::{normalize_block_math, prepare_for_export};
//!
//! let preview = normalize_block_math(r"Let \[x^2\] be given");
//! assert_eq!(preview, "Let\n\n\\[x^2\\]\n\nbe given");
//!
//! let export = prepare_for_export(r"Inline \(a\) and \[b\]");
//! assert_eq!(export, "Inline $a$ and\n\n$$b$$\n");
//! ```

mod block_math;
mod export;
mod fence;
mod lexer;

pub use block_math::{normalize_block_math, normalize_standalone_blocks, separate_embedded_blocks};
pub use export::{
    collapse_dollar_padding, convert_math_delimiters, expand_spacing_directives,
    prepare_for_export, strip_arithmatex_wrappers,
};
pub use fence::FencedBlock;
pub use lexer::{Token, TokenKind, fenced_blocks, lex};
