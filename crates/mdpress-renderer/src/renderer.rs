//! Preview renderer built on pulldown-cmark's HTML writer.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream};

use crate::math::ProtectedMath;
use crate::util::escape_html;

/// Renders Markdown to the HTML fragment shown in the preview pane.
///
/// On top of plain `CommonMark` output:
/// - math spans become `arithmatex` elements for client-side MathJax
/// - soft line breaks render as `<br />`
/// - code blocks are wrapped in `<div class="codehilite">`
///
/// # Example
///
/// ```
/// use mdpress_renderer::PreviewRenderer;
///
/// let html = PreviewRenderer::new().render("Area \\(\\pi r^2\\)\nsecond line");
/// assert_eq!(
///     html,
///     "<p>Area <span class=\"arithmatex\">\\(\\pi r^2\\)</span><br />\nsecond line</p>\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    gfm: bool,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewRenderer {
    /// Create a renderer with GFM enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { gfm: true }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render Markdown to an HTML fragment.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let math = ProtectedMath::protect(markdown);
        let parser = Parser::new_ext(&math.text, self.parser_options());

        let mut events = Vec::new();
        let mut code: Option<(Option<String>, String)> = None;

        for event in TextMergeStream::new(parser) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code = Some((code_language(&kind), String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, content)) = code.take() {
                        let html = code_block(lang.as_deref(), &math.unprotect(&content));
                        events.push(Event::Html(CowStr::from(html)));
                    }
                }
                Event::Text(text) if code.is_some() => {
                    if let Some((_, content)) = code.as_mut() {
                        content.push_str(&text);
                    }
                }
                Event::Code(text) => {
                    let html = format!("<code>{}</code>", escape_html(&math.unprotect(&text)));
                    events.push(Event::InlineHtml(CowStr::from(html)));
                }
                Event::SoftBreak => events.push(Event::HardBreak),
                other => events.push(other),
            }
        }

        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        math.restore(&html)
    }
}

/// Language tag of a fenced block (first word of the info string).
fn code_language(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_owned),
        CodeBlockKind::Indented => None,
    }
}

fn code_block(lang: Option<&str>, content: &str) -> String {
    let mut html = match lang {
        Some(lang) => format!(
            r#"<div class="codehilite"><pre><code class="language-{}">{}</code></pre></div>"#,
            escape_html(lang),
            escape_html(content)
        ),
        None => format!(
            r#"<div class="codehilite"><pre><code>{}</code></pre></div>"#,
            escape_html(content)
        ),
    };
    html.push('\n');
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(markdown: &str) -> String {
        PreviewRenderer::new().render(markdown)
    }

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(render("Hello, **world**!"), "<p>Hello, <strong>world</strong>!</p>\n");
    }

    #[test]
    fn test_soft_break_becomes_br() {
        assert_eq!(render("one\ntwo"), "<p>one<br />\ntwo</p>\n");
    }

    #[test]
    fn test_code_block_with_language() {
        assert_eq!(
            render("```rust\nfn main() {}\n```"),
            "<div class=\"codehilite\"><pre><code class=\"language-rust\">fn main() {}\n</code></pre></div>\n"
        );
    }

    #[test]
    fn test_code_block_without_language() {
        assert_eq!(
            render("```\na < b\n```"),
            "<div class=\"codehilite\"><pre><code>a &lt; b\n</code></pre></div>\n"
        );
    }

    #[test]
    fn test_math_in_code_is_verbatim() {
        let html = render("`\\(a_1\\)`\n\n```\n\\[x\\]\n```");

        assert!(html.contains(r"<code>\(a_1\)</code>"), "{html}");
        assert!(html.contains("<code>\\[x\\]\n</code>"), "{html}");
        assert!(!html.contains("arithmatex"));
    }

    #[test]
    fn test_indented_code_restores_math_source() {
        let html = render("    \\(a\\)\n");
        assert_eq!(
            html,
            "<div class=\"codehilite\"><pre><code>\\(a\\)\n</code></pre></div>\n"
        );
    }

    #[test]
    fn test_inline_math_keeps_underscores_and_backslashes() {
        assert_eq!(
            render(r"\(a_1 + b_2 \cdot c\)"),
            "<p><span class=\"arithmatex\">\\(a_1 + b_2 \\cdot c\\)</span></p>\n"
        );
    }

    #[test]
    fn test_literal_placeholder_text_survives() {
        assert_eq!(
            render(r"{{MATH_0}} and \(a\)"),
            "<p>{{MATH_0}} and <span class=\"arithmatex\">\\(a\\)</span></p>\n"
        );
    }

    #[test]
    fn test_block_math_replaces_paragraph() {
        assert_eq!(
            render("before\n\n\\[ \\sum_i x_i \\]\n\nafter"),
            "<p>before</p>\n<div class=\"arithmatex\">\\[ \\sum_i x_i \\]</div>\n<p>after</p>\n"
        );
    }

    #[test]
    fn test_table() {
        let html = render("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_strikethrough_and_gfm_toggle() {
        assert!(render("~~gone~~").contains("<del>gone</del>"));
        assert!(
            !PreviewRenderer::new()
                .with_gfm(false)
                .render("~~gone~~")
                .contains("<del>")
        );
    }

    #[test]
    fn test_data_uri_image() {
        assert_eq!(
            render("\n![](data:image/png;base64,iVBORw==)\n"),
            "<p><img src=\"data:image/png;base64,iVBORw==\" alt=\"\" /></p>\n"
        );
    }

    #[test]
    fn test_diagram_error_marker() {
        assert_eq!(
            render("\n**[Diagram Error: boom]**\n"),
            "<p><strong>[Diagram Error: boom]</strong></p>\n"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }
}
