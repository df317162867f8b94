//! Markdown to HTML preview rendering for mdpress.
//!
//! [`PreviewRenderer`] wraps pulldown-cmark and produces the HTML fragment
//! shown in the editor's preview pane. Math written with `\( \)` and `\[ \]`
//! survives parsing untouched and is emitted in the `arithmatex` markup the
//! editor page feeds to MathJax.
//!
//! # Example
//!
//! ```
//! use mdpress_renderer::PreviewRenderer;
//!
//! let html = PreviewRenderer::new().render("# Hello\n\n**Bold** text");
//! assert!(html.contains("<h1>Hello</h1>"));
//! ```

mod math;
mod renderer;
mod util;

pub use renderer::PreviewRenderer;
pub use util::escape_html;
