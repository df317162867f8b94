//! Blank-line isolation for block math.
//!
//! Markdown renderers only treat `\[ ... \]` as block content when it sits in
//! its own paragraph. Both passes here only touch whitespace around block
//! math spans; the content between `\[` and `\]` is copied verbatim.

use crate::lexer::{Token, TokenKind, lex};

/// Isolate every block math span with blank lines.
///
/// Runs [`separate_embedded_blocks`] over the whole document, then
/// [`normalize_standalone_blocks`] over the result. The output is a fixed
/// point: normalizing it again returns it unchanged.
///
/// # Example
///
/// ```
/// use mdpress_normalize::normalize_block_math;
///
/// let text = normalize_block_math(r"where \[ x+y \] holds");
/// assert_eq!(text, "where\n\n\\[ x+y \\]\n\nholds");
/// ```
#[must_use]
pub fn normalize_block_math(input: &str) -> String {
    normalize_standalone_blocks(&separate_embedded_blocks(input))
}

/// Move block math that shares a line with other content onto its own lines.
///
/// For each `\[ ... \]` with non-whitespace content on the same line before
/// it, the horizontal whitespace in between is dropped and a blank line is
/// inserted. The same happens for content after it.
#[must_use]
pub fn separate_embedded_blocks(input: &str) -> String {
    let tokens = lex(input);
    let mut output = String::with_capacity(input.len() + 8 * tokens.len());
    let mut trim_next = false;

    for token in &tokens {
        if token.kind != TokenKind::BlockMath {
            let source = if trim_next {
                token.source.trim_start_matches([' ', '\t'])
            } else {
                token.source
            };
            trim_next = false;
            output.push_str(source);
            continue;
        }

        trim_next = false;
        if !current_line(&output).trim().is_empty() {
            output.truncate(output.trim_end_matches([' ', '\t']).len());
            output.push_str("\n\n");
        }
        output.push_str(token.source);

        if !rest_of_line(input, token).trim().is_empty() {
            output.push_str("\n\n");
            trim_next = true;
        }
    }

    output
}

/// Normalize whitespace around block math that already stands on its own line.
///
/// A span qualifies when only whitespace precedes it on its line and only
/// whitespace follows it until the end of the line. Blank lines before it
/// collapse to exactly one (none at the start of the document); after it comes
/// exactly one blank line, or a single newline at the end of the document.
#[must_use]
pub fn normalize_standalone_blocks(input: &str) -> String {
    let tokens = lex(input);
    let mut output = String::with_capacity(input.len() + 4 * tokens.len());
    let mut pending_break = false;

    for token in &tokens {
        let is_standalone = token.kind == TokenKind::BlockMath
            && (pending_break || current_line(&output).trim().is_empty())
            && rest_of_line(input, token).trim().is_empty();

        if pending_break {
            if is_standalone {
                // Adjacent standalone blocks: the separator comes from the
                // leading side below.
                pending_break = false;
            } else {
                let source = if token.kind == TokenKind::Text {
                    skip_blank_lines(token.source)
                } else {
                    token.source
                };
                if source.is_empty() {
                    continue;
                }
                output.push_str("\n\n");
                output.push_str(source);
                pending_break = false;
                continue;
            }
        }

        if !is_standalone {
            output.push_str(token.source);
            continue;
        }

        output.truncate(output.trim_end().len());
        if !output.is_empty() {
            output.push_str("\n\n");
        }
        output.push_str(token.source);
        pending_break = true;
    }

    if pending_break {
        output.push('\n');
    }

    output
}

/// The last (possibly partial) line of the output built so far.
fn current_line(output: &str) -> &str {
    output.rfind('\n').map_or(output, |pos| &output[pos + 1..])
}

/// Input following the token up to (not including) the next newline.
fn rest_of_line<'a>(input: &'a str, token: &Token<'_>) -> &'a str {
    let rest = &input[token.span.end..];
    rest.find('\n').map_or(rest, |pos| &rest[..pos])
}

/// Drop leading whitespace-only lines, keeping the indentation of the first
/// line with content.
fn skip_blank_lines(text: &str) -> &str {
    let content_start = text.len() - text.trim_start().len();
    match text[..content_start].rfind('\n') {
        Some(pos) => &text[pos + 1..],
        None => &text[content_start..],
    }
}
