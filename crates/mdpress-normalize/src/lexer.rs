//! Delimiter lexer.
//!
//! Splits a Markdown document into text, math spans and code in a single
//! left-to-right scan. Concatenating the `source` of every token reproduces
//! the input exactly.

use std::ops::Range;

use crate::fence::{FencedBlock, parse_fence};

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Ordinary Markdown text.
    Text,
    /// Block math `\[ ... \]`.
    BlockMath,
    /// Inline math `\( ... \)`.
    InlineMath,
    /// Fenced code block.
    Fence,
    /// Inline code span.
    CodeSpan,
}

/// A contiguous piece of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Byte range in the input.
    pub span: Range<usize>,
    /// Source slice, delimiters included.
    pub source: &'a str,
}

impl<'a> Token<'a> {
    /// Content between the math delimiters.
    ///
    /// For non-math tokens this is the whole source.
    #[must_use]
    pub fn inner(&self) -> &'a str {
        match self.kind {
            TokenKind::BlockMath | TokenKind::InlineMath => {
                &self.source[2..self.source.len() - 2]
            }
            _ => self.source,
        }
    }

    /// Whether the token is code that must be left verbatim.
    #[must_use]
    pub fn is_code(&self) -> bool {
        matches!(self.kind, TokenKind::Fence | TokenKind::CodeSpan)
    }
}

/// Lex a document into tokens.
///
/// - `\[` opens block math closed by the first following `\]`; `\(` opens
///   inline math closed by the first following `\)`. Both may span lines.
/// - `\\` is consumed as a pair and never opens or closes a span.
/// - An opening delimiter without a closing partner is text.
/// - Fenced code blocks and inline code spans are verbatim.
#[must_use]
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer {
        input,
        tokens: Vec::new(),
        text_start: 0,
    };
    lexer.run();
    lexer.tokens
}

/// All fenced code blocks of a document, in order.
#[must_use]
pub fn fenced_blocks(input: &str) -> Vec<FencedBlock<'_>> {
    lex(input)
        .into_iter()
        .filter(|token| token.kind == TokenKind::Fence)
        .filter_map(|token| parse_fence(input, token.span.start))
        .collect()
}

struct Lexer<'a> {
    input: &'a str,
    tokens: Vec<Token<'a>>,
    text_start: usize,
}

impl<'a> Lexer<'a> {
    fn run(&mut self) {
        let input = self.input;
        let bytes = input.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            if (i == 0 || bytes[i - 1] == b'\n')
                && let Some(block) = parse_fence(input, i)
            {
                i = self.emit(TokenKind::Fence, i..block.span.end);
                continue;
            }

            match bytes[i] {
                b'\\' => match bytes.get(i + 1) {
                    Some(b'\\') => i += 2,
                    Some(b'[') => match find_closing(bytes, i + 2, b']') {
                        Some(close) => i = self.emit(TokenKind::BlockMath, i..close + 2),
                        None => i += 2,
                    },
                    Some(b'(') => match find_closing(bytes, i + 2, b')') {
                        Some(close) => i = self.emit(TokenKind::InlineMath, i..close + 2),
                        None => i += 2,
                    },
                    _ => i += 1,
                },
                b'`' => {
                    let run = count_run(bytes, i, b'`');
                    match find_backtick_run(input, i + run, run) {
                        Some(end) => i = self.emit(TokenKind::CodeSpan, i..end),
                        None => i += run,
                    }
                }
                _ => i += 1,
            }
        }

        self.flush_text(bytes.len());
    }

    /// Push pending text, then the token. Returns the token end.
    fn emit(&mut self, kind: TokenKind, span: Range<usize>) -> usize {
        self.flush_text(span.start);
        let input = self.input;
        let end = span.end;
        self.tokens.push(Token {
            kind,
            source: &input[span.clone()],
            span,
        });
        self.text_start = end;
        end
    }

    fn flush_text(&mut self, end: usize) {
        let input = self.input;
        if end > self.text_start {
            self.tokens.push(Token {
                kind: TokenKind::Text,
                span: self.text_start..end,
                source: &input[self.text_start..end],
            });
        }
        self.text_start = end;
    }
}

/// Find the backslash of the closing `\<close>` delimiter at or after `from`.
fn find_closing(bytes: &[u8], from: usize, close: u8) -> Option<usize> {
    let mut j = from;
    while j + 1 < bytes.len() {
        if bytes[j] == b'\\' {
            if bytes[j + 1] == close {
                return Some(j);
            }
            if bytes[j + 1] == b'\\' {
                j += 2;
                continue;
            }
        }
        j += 1;
    }
    None
}

fn count_run(bytes: &[u8], from: usize, byte: u8) -> usize {
    bytes[from..].iter().take_while(|&&b| b == byte).count()
}

/// Find a backtick run of exactly `len` at or after `from`; returns its end.
///
/// A code span never crosses a block boundary: the search gives up at a
/// blank line or at a line that opens a fenced block.
fn find_backtick_run(input: &str, from: usize, len: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut j = from;
    while j < bytes.len() {
        if bytes[j] == b'\n' {
            let next = j + 1;
            if is_blank_line(bytes, next) || parse_fence(input, next).is_some() {
                return None;
            }
            j = next;
        } else if bytes[j] == b'`' {
            let run = count_run(bytes, j, b'`');
            if run == len {
                return Some(j + run);
            }
            j += run;
        } else {
            j += 1;
        }
    }
    None
}

/// Whether the line starting at `from` holds only whitespace.
fn is_blank_line(bytes: &[u8], from: usize) -> bool {
    bytes[from..]
        .iter()
        .take_while(|&&b| b != b'\n')
        .all(u8::is_ascii_whitespace)
}
