//! Fenced code block detection.
//!
//! Code fences in `CommonMark` can use backticks or tildes (three or more),
//! indented by at most three spaces. The closing fence must use the same
//! character and be at least as long as the opening fence. An unclosed fence
//! runs to the end of the document.

use std::ops::Range;

/// A fenced code block located in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// Byte range of the whole block, fences included.
    pub span: Range<usize>,
    /// Info string after the opening fence, trimmed.
    pub info: &'a str,
    /// Lines between the opening and closing fence.
    pub content: &'a str,
}

impl FencedBlock<'_> {
    /// First word of the info string (the language tag).
    #[must_use]
    pub fn language(&self) -> &str {
        self.info.split_whitespace().next().unwrap_or("")
    }
}

/// Parse a fenced code block starting at byte `start`, which must be the
/// start of a line.
///
/// Returns `None` if the line is not an opening fence.
pub(crate) fn parse_fence(input: &str, start: usize) -> Option<FencedBlock<'_>> {
    let first_line_end = input[start..].find('\n').map_or(input.len(), |p| start + p);
    let line = &input[start..first_line_end];

    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let (fence_char, fence_len) = detect_fence(&line[indent..])?;
    let info = line[indent + fence_len..].trim();
    if fence_char == '`' && info.contains('`') {
        return None;
    }

    let content_start = (first_line_end + 1).min(input.len());
    let mut line_start = content_start;
    while line_start < input.len() {
        let line_end = input[line_start..]
            .find('\n')
            .map_or(input.len(), |p| line_start + p);
        let candidate = &input[line_start..line_end];
        let candidate_indent = candidate.len() - candidate.trim_start_matches(' ').len();
        if candidate_indent <= 3
            && is_fence_line(&candidate[candidate_indent..], fence_char, fence_len)
        {
            let end = (line_end + 1).min(input.len());
            return Some(FencedBlock {
                span: start..end,
                info,
                content: &input[content_start..line_start],
            });
        }
        line_start = line_end + 1;
    }

    Some(FencedBlock {
        span: start..input.len(),
        info,
        content: &input[content_start..],
    })
}

/// Detect if a line starts a code fence.
///
/// Returns the fence character and length if found.
fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    (count >= 3).then_some((first, count))
}

/// Check if a line is a valid closing fence.
fn is_fence_line(trimmed: &str, expected_char: char, min_len: usize) -> bool {
    let count = trimmed.chars().take_while(|&c| c == expected_char).count();
    if count < min_len {
        return false;
    }

    // After fence chars, only whitespace is allowed
    trimmed[count..].chars().all(char::is_whitespace)
}
