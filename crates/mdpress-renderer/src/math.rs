//! Math protection around the Markdown parser.
//!
//! Markdown parsing would eat backslashes and underscores inside formulas, so
//! every math span is swapped for a `{{MATH_n}}` placeholder before parsing
//! and swapped back after rendering. If the document already contains the
//! placeholder prefix, a numbered variant (`{{MATH1_n}}`, ...) that does not
//! occur in it is used instead.

use mdpress_normalize::{TokenKind, lex};

use crate::util::escape_html;

const PLACEHOLDER_PREFIX: &str = "{{MATH_";
const PLACEHOLDER_SUFFIX: &str = "}}";

/// First placeholder prefix that does not occur in `markdown`.
fn unused_prefix(markdown: &str) -> String {
    if !markdown.contains(PLACEHOLDER_PREFIX) {
        return PLACEHOLDER_PREFIX.to_owned();
    }
    (1_u32..)
        .map(|n| format!("{{{{MATH{n}_"))
        .find(|prefix| !markdown.contains(prefix.as_str()))
        .unwrap_or_else(|| PLACEHOLDER_PREFIX.to_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MathKind {
    Inline,
    Block,
}

#[derive(Debug)]
struct MathSpan {
    kind: MathKind,
    /// Original source including delimiters.
    source: String,
    /// Content between the delimiters.
    inner: String,
}

impl MathSpan {
    fn to_html(&self) -> String {
        match self.kind {
            MathKind::Inline => format!(
                r#"<span class="arithmatex">\({}\)</span>"#,
                escape_html(&self.inner)
            ),
            MathKind::Block => format!(
                r#"<div class="arithmatex">\[{}\]</div>"#,
                escape_html(&self.inner)
            ),
        }
    }
}

/// Markdown with math replaced by placeholders.
#[derive(Debug)]
pub(crate) struct ProtectedMath {
    pub(crate) text: String,
    prefix: String,
    spans: Vec<MathSpan>,
}

impl ProtectedMath {
    /// Replace every math token outside code with a placeholder.
    pub(crate) fn protect(markdown: &str) -> Self {
        let prefix = unused_prefix(markdown);
        let mut text = String::with_capacity(markdown.len());
        let mut spans = Vec::new();

        for token in lex(markdown) {
            let kind = match token.kind {
                TokenKind::InlineMath => MathKind::Inline,
                TokenKind::BlockMath => MathKind::Block,
                _ => {
                    text.push_str(token.source);
                    continue;
                }
            };
            text.push_str(&prefix);
            text.push_str(&spans.len().to_string());
            text.push_str(PLACEHOLDER_SUFFIX);
            spans.push(MathSpan {
                kind,
                source: token.source.to_owned(),
                inner: token.inner().to_owned(),
            });
        }

        Self {
            text,
            prefix,
            spans,
        }
    }

    /// Put the original source back, for text that ends up inside code.
    pub(crate) fn unprotect(&self, text: &str) -> String {
        self.replace_placeholders(text, |span, out, _| {
            out.push_str(&span.source);
            0
        })
    }

    /// Replace placeholders in rendered HTML with MathJax-ready markup.
    ///
    /// A block placeholder that is alone in a paragraph takes the place of
    /// the whole `<p>` element.
    pub(crate) fn restore(&self, html: &str) -> String {
        self.replace_placeholders(html, |span, out, rest| {
            if span.kind == MathKind::Block
                && out.ends_with("<p>")
                && rest.starts_with("</p>")
            {
                out.truncate(out.len() - "<p>".len());
                out.push_str(&span.to_html());
                return "</p>".len();
            }
            out.push_str(&span.to_html());
            0
        })
    }

    /// Single pass over `text`; `apply` writes the replacement for a known
    /// placeholder and returns how many bytes of the following text it
    /// consumed.
    fn replace_placeholders<F>(&self, text: &str, mut apply: F) -> String
    where
        F: FnMut(&MathSpan, &mut String, &str) -> usize,
    {
        if self.spans.is_empty() {
            return text.to_owned();
        }

        let mut result = String::with_capacity(text.len());
        let mut remaining = text;

        let prefix = self.prefix.as_str();
        while let Some(start) = remaining.find(prefix) {
            result.push_str(&remaining[..start]);
            let after_prefix = &remaining[start + prefix.len()..];

            let Some(end_pos) = after_prefix.find(PLACEHOLDER_SUFFIX) else {
                result.push_str(&remaining[start..]);
                remaining = "";
                break;
            };

            let placeholder_end = start + prefix.len() + end_pos + PLACEHOLDER_SUFFIX.len();
            let span = after_prefix[..end_pos]
                .parse::<usize>()
                .ok()
                .and_then(|index| self.spans.get(index));

            match span {
                Some(span) => {
                    let rest = &remaining[placeholder_end..];
                    let consumed = apply(span, &mut result, rest);
                    remaining = &rest[consumed..];
                }
                None => {
                    // Not one of ours, keep as-is
                    result.push_str(&remaining[start..placeholder_end]);
                    remaining = &remaining[placeholder_end..];
                }
            }
        }

        result.push_str(remaining);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_protect_replaces_math_outside_code() {
        let protected = ProtectedMath::protect(r"a \(x_1\) b `\(y\)` \[z\]");

        assert_eq!(protected.text, r"a {{MATH_0}} b `\(y\)` {{MATH_1}}");
        assert_eq!(protected.spans.len(), 2);
        assert_eq!(protected.spans[0].inner, "x_1");
        assert_eq!(protected.spans[1].kind, MathKind::Block);
    }

    #[test]
    fn test_unprotect_restores_source() {
        let protected = ProtectedMath::protect(r"\(a\) and \[b\]");
        assert_eq!(protected.unprotect(&protected.text), r"\(a\) and \[b\]");
    }

    #[test]
    fn test_restore_inline() {
        let protected = ProtectedMath::protect(r"\(a<b\)");
        assert_eq!(
            protected.restore("<p>{{MATH_0}}</p>"),
            r#"<p><span class="arithmatex">\(a&lt;b\)</span></p>"#
        );
    }

    #[test]
    fn test_restore_block_drops_paragraph() {
        let protected = ProtectedMath::protect(r"\[x\]");
        assert_eq!(
            protected.restore("<p>{{MATH_0}}</p>\n"),
            "<div class=\"arithmatex\">\\[x\\]</div>\n"
        );
    }

    #[test]
    fn test_restore_block_inside_text_keeps_paragraph() {
        let protected = ProtectedMath::protect(r"\[x\]");
        assert_eq!(
            protected.restore("<p>see {{MATH_0}}</p>"),
            r#"<p>see <div class="arithmatex">\[x\]</div></p>"#
        );
    }

    #[test]
    fn test_unknown_placeholders_kept() {
        let protected = ProtectedMath::protect(r"\(a\)");
        assert_eq!(
            protected.restore("{{MATH_7}} {{MATH_x}} {{MATH_"),
            "{{MATH_7}} {{MATH_x}} {{MATH_"
        );
    }

    #[test]
    fn test_literal_placeholder_in_input_is_not_replaced() {
        let protected = ProtectedMath::protect(r"{{MATH_0}} and \(a\)");

        assert_eq!(protected.text, r"{{MATH_0}} and {{MATH1_0}}");
        assert_eq!(
            protected.restore("<p>{{MATH_0}} and {{MATH1_0}}</p>"),
            r#"<p>{{MATH_0}} and <span class="arithmatex">\(a\)</span></p>"#
        );
    }

    #[test]
    fn test_unused_prefix_skips_taken_variants() {
        assert_eq!(unused_prefix("plain"), "{{MATH_");
        assert_eq!(unused_prefix("{{MATH_0}}"), "{{MATH1_");
        assert_eq!(unused_prefix("{{MATH_0}} {{MATH1_0}}"), "{{MATH2_");
    }
}
