//! Math re-mapping for document export.
//!
//! The preview keeps LaTeX-style `\( \)` and `\[ \]` delimiters for MathJax.
//! Pandoc expects `$...$` and `$$...$$` instead, so the export path rewrites
//! the raw input with a fixed sequence of rules (order matters).

use std::sync::LazyLock;

use regex::Regex;

use crate::block_math::normalize_block_math;
use crate::lexer::{TokenKind, lex};

/// One level of arithmatex wrapper markup (single line, non-greedy).
static ARITHMATEX_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<span class="arithmatex">(.*?)</span>"#).unwrap());

/// Prepare raw Markdown for the document converter.
///
/// Applies, in order:
/// 1. [`expand_spacing_directives`]
/// 2. [`normalize_block_math`]
/// 3. [`strip_arithmatex_wrappers`]
/// 4. and 5. [`convert_math_delimiters`]
/// 6. [`collapse_dollar_padding`]
///
/// # Example
///
/// ```
/// use mdpress_normalize::prepare_for_export;
///
/// assert_eq!(prepare_for_export(r"area \( \pi r^2 \)"), r"area $\pi r^2$");
/// ```
#[must_use]
pub fn prepare_for_export(input: &str) -> String {
    let text = expand_spacing_directives(input);
    let text = normalize_block_math(&text);
    let text = strip_arithmatex_wrappers(&text);
    let text = convert_math_delimiters(&text);
    collapse_dollar_padding(&text)
}

/// Replace the literal `\[1mm]` spacing token with `\vspace{1mm}`.
#[must_use]
pub fn expand_spacing_directives(input: &str) -> String {
    input.replace(r"\[1mm]", r"\vspace{1mm}")
}

/// Remove `<span class="arithmatex">` wrappers, keeping their content.
///
/// Only one level is unwrapped; the match never crosses a line break.
#[must_use]
pub fn strip_arithmatex_wrappers(input: &str) -> String {
    ARITHMATEX_SPAN_RE.replace_all(input, "$1").into_owned()
}

/// Rewrite `\(x\)` to `$x$` and `\[x\]` to `$$x$$`.
///
/// Only matched delimiter pairs outside code are rewritten; everything else is
/// copied unchanged.
#[must_use]
pub fn convert_math_delimiters(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for token in lex(input) {
        match token.kind {
            TokenKind::InlineMath => {
                output.push('$');
                output.push_str(token.inner());
                output.push('$');
            }
            TokenKind::BlockMath => {
                output.push_str("$$");
                output.push_str(token.inner());
                output.push_str("$$");
            }
            _ => output.push_str(token.source),
        }
    }

    output
}

/// Collapse `$ formula $` to `$formula$`.
///
/// Lone `$` signs are paired left to right within a line; a pair whose
/// content is padded by at least one space on both sides loses the padding.
/// A `$` next to another `$` or escaped as `\$` never pairs, so display math
/// (`$$ a+b $$`) is left alone. Code is not touched.
#[must_use]
pub fn collapse_dollar_padding(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for token in lex(input) {
        if token.is_code() {
            output.push_str(token.source);
        } else {
            collapse_in_text(token.source, &mut output);
        }
    }

    output
}

fn collapse_in_text(text: &str, output: &mut String) {
    let bytes = text.as_bytes();
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !is_lone_dollar(bytes, i) {
            i += 1;
            continue;
        }

        let line_end = text[i..].find('\n').map_or(text.len(), |pos| i + pos);
        let Some(close) = (i + 1..line_end).find(|&j| is_lone_dollar(bytes, j)) else {
            i += 1;
            continue;
        };

        let inner = &text[i + 1..close];
        let formula = inner.trim_matches(' ');
        if inner.starts_with(' ') && inner.ends_with(' ') && !formula.is_empty() {
            output.push_str(&text[copied..i]);
            output.push('$');
            output.push_str(formula);
            output.push('$');
            copied = close + 1;
        }
        i = close + 1;
    }

    output.push_str(&text[copied..]);
}

/// A `$` that is neither doubled nor escaped.
fn is_lone_dollar(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'$'
        && (i == 0 || (bytes[i - 1] != b'$' && bytes[i - 1] != b'\\'))
        && bytes.get(i + 1) != Some(&b'$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_spacing_directive() {
        assert_eq!(
            expand_spacing_directives(r"a \\[1mm] b \[1mm]"),
            r"a \\vspace{1mm} b \vspace{1mm}"
        );
    }

    #[test]
    fn test_strip_arithmatex_wrappers() {
        assert_eq!(
            strip_arithmatex_wrappers(r#"x <span class="arithmatex">\(a\)</span> y"#),
            r"x \(a\) y"
        );
    }

    #[test]
    fn test_strip_arithmatex_one_level_non_greedy() {
        assert_eq!(
            strip_arithmatex_wrappers(
                r#"<span class="arithmatex">a</span> and <span class="arithmatex">b</span>"#
            ),
            "a and b"
        );
    }

    #[test]
    fn test_strip_arithmatex_does_not_cross_lines() {
        let input = "<span class=\"arithmatex\">a\nb</span>";
        assert_eq!(strip_arithmatex_wrappers(input), input);
    }

    #[test]
    fn test_inline_and_block_delimiters() {
        assert_eq!(convert_math_delimiters(r"\(a\)"), "$a$");
        assert_eq!(convert_math_delimiters(r"\[b\]"), "$$b$$");
        assert_eq!(
            convert_math_delimiters(r"see \(a\) and \[b\] done"),
            "see $a$ and $$b$$ done"
        );
    }

    #[test]
    fn test_delimiters_in_code_untouched() {
        let input = "`\\(a\\)`\n\n```\n\\[b\\]\n```\n";
        assert_eq!(convert_math_delimiters(input), input);
    }

    #[test]
    fn test_stray_backtick_does_not_hide_math() {
        assert_eq!(
            prepare_for_export("Press ` to start.\n\nEnergy \\(E\\) here.\n\nThen `make`."),
            "Press ` to start.\n\nEnergy $E$ here.\n\nThen `make`."
        );
    }

    #[test]
    fn test_collapse_inline_padding() {
        assert_eq!(collapse_dollar_padding("$ a+b $"), "$a+b$");
        assert_eq!(collapse_dollar_padding("x $  a + b  $ y"), "x $a + b$ y");
    }

    #[test]
    fn test_collapse_leaves_display_math() {
        assert_eq!(collapse_dollar_padding("$$ a+b $$"), "$$ a+b $$");
    }

    #[test]
    fn test_collapse_multiple_formulas() {
        assert_eq!(
            collapse_dollar_padding("$ a $ and $ b $"),
            "$a$ and $b$"
        );
    }

    #[test]
    fn test_collapse_requires_padding_both_sides() {
        assert_eq!(collapse_dollar_padding("$ a$"), "$ a$");
        assert_eq!(collapse_dollar_padding("$a $"), "$a $");
        assert_eq!(collapse_dollar_padding("costs $ 5"), "costs $ 5");
    }

    #[test]
    fn test_collapse_pairs_dollars_in_order() {
        assert_eq!(collapse_dollar_padding("$a$ and $ b $"), "$a$ and $b$");
        assert_eq!(collapse_dollar_padding("$  $"), "$  $");
        assert_eq!(collapse_dollar_padding(r"\$ 5 and $ x $"), r"\$ 5 and $x$");
    }

    #[test]
    fn test_collapse_stays_on_one_line() {
        assert_eq!(collapse_dollar_padding("$ a\nb $"), "$ a\nb $");
    }

    #[test]
    fn test_collapse_ignores_code() {
        assert_eq!(collapse_dollar_padding("`$ a $`"), "`$ a $`");
    }

    #[test]
    fn test_prepare_round_trip() {
        assert_eq!(prepare_for_export(r"\(a\)"), "$a$");
        assert_eq!(prepare_for_export(r"\[b\]"), "$$b$$\n");
    }

    #[test]
    fn test_prepare_full_document() {
        let input = concat!(
            "Energy \\( E = mc^2 \\) is famous.\n",
            "Sum: \\[ \\sum_i x_i \\] done\\[1mm]\n",
            "<span class=\"arithmatex\">\\(y\\)</span>\n",
        );
        let expected = concat!(
            "Energy $E = mc^2$ is famous.\n",
            "Sum:\n\n",
            "$$ \\sum_i x_i $$\n\n",
            "done\\vspace{1mm}\n",
            "$y$\n",
        );
        assert_eq!(prepare_for_export(input), expected);
    }

    #[test]
    fn test_prepare_keeps_unicode() {
        assert_eq!(prepare_for_export("中文 \\(α\\) 结束"), "中文 $α$ 结束");
    }
}
