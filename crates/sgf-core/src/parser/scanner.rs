//! SGF Scanner — escape-aware delimiter search over raw SGF text
//!
//! Every structural decision in the parser goes through [`find_first`]:
//! it looks for the next unescaped delimiter from a cursor and, when asked,
//! refuses to skip over anything but whitespace.
//!
//! Guarantees:
//! - The returned offset is always strictly at or after the cursor
//! - Runs in time linear in the scanned distance
//! - Delimiters are ASCII, so every returned offset is a `char` boundary

use serde::{Deserialize, Serialize};

/// The escape character: the byte after it never acts as a delimiter
pub const ESCAPE: u8 = b'\\';

/// Position in source text for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Span {
    /// Resolve a byte offset into a 1-based line and column.
    ///
    /// Offsets past the end of `text` resolve to the end of input.
    pub fn at(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let mut line = 1;
        let mut column = 1;
        for &byte in &text.as_bytes()[..offset] {
            if byte == b'\n' {
                line += 1;
                column = 1;
            } else if byte & 0xC0 != 0x80 {
                // count chars, not UTF-8 continuation bytes
                column += 1;
            }
        }
        Span {
            line,
            column,
            offset,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Find the first unescaped occurrence of any byte in `targets`.
///
/// Scanning starts at `start`. A backslash escapes exactly one following
/// byte. With `expect_contents == false` the search gives up as soon as it
/// meets a byte that is neither whitespace nor a target, so only whitespace
/// may precede the delimiter. Returns `None` when nothing is found.
pub fn find_first(text: &str, start: usize, targets: &[u8], expect_contents: bool) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut escaping = false;

    for (pos, &cur) in bytes.iter().enumerate().skip(start) {
        if escaping {
            escaping = false;
            continue;
        }
        if cur == ESCAPE {
            escaping = true;
        } else if targets.contains(&cur) {
            let delimiter = cur as char;
            tracing::trace!(pos, %delimiter, "delimiter found");
            return Some(pos);
        } else if !expect_contents && !cur.is_ascii_whitespace() {
            tracing::trace!(pos, "stray content before delimiter");
            return None;
        }
    }

    None
}

/// Slice `text[start..end]` and strip surrounding ASCII whitespace
pub fn trimmed(text: &str, start: usize, end: usize) -> &str {
    text[start..end].trim_matches(|c: char| c.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Plain search ───────────────────────────────────

    #[test]
    fn test_find_first_target() {
        assert_eq!(find_first("ab[cd]", 0, b"[", true), Some(2));
        assert_eq!(find_first("ab[cd]", 0, b"]", true), Some(5));
    }

    #[test]
    fn test_find_first_any_of_targets() {
        assert_eq!(find_first("xx)y;(", 0, b"[;()", true), Some(2));
    }

    #[test]
    fn test_find_first_from_cursor() {
        assert_eq!(find_first("[a][b]", 1, b"[", true), Some(3));
    }

    #[test]
    fn test_find_first_not_found() {
        assert_eq!(find_first("abc", 0, b"[", true), None);
        assert_eq!(find_first("", 0, b"(", false), None);
    }

    #[test]
    fn test_find_first_cursor_past_end() {
        assert_eq!(find_first("(", 5, b"(", true), None);
    }

    // ── Escaping ───────────────────────────────────────

    #[test]
    fn test_escaped_delimiter_is_skipped() {
        let text = r"a\]b]";
        assert_eq!(find_first(text, 0, b"]", true), Some(4));
    }

    #[test]
    fn test_escaped_backslash_does_not_escape_delimiter() {
        let text = r"a\\]";
        assert_eq!(find_first(text, 0, b"]", true), Some(3));
    }

    #[test]
    fn test_escape_resets_after_one_byte() {
        let text = r"\x]";
        assert_eq!(find_first(text, 0, b"]", true), Some(2));
    }

    #[test]
    fn test_trailing_escape_finds_nothing() {
        assert_eq!(find_first(r"abc\", 0, b"]", true), None);
    }

    // ── Content tolerance ──────────────────────────────

    #[test]
    fn test_whitespace_allowed_before_structural_delimiter() {
        assert_eq!(find_first(" \n\t (", 0, b"(", false), Some(4));
    }

    #[test]
    fn test_stray_content_rejected() {
        assert_eq!(find_first("a;", 0, b";", false), None);
        assert_eq!(find_first("\n\n;", 0, b"(", false), None);
    }

    #[test]
    fn test_stray_content_tolerated_when_expected() {
        assert_eq!(find_first("a;", 0, b";", true), Some(1));
    }

    // ── Helpers ────────────────────────────────────────

    #[test]
    fn test_trimmed() {
        assert_eq!(trimmed(" \n AB \t[", 0, 7), "AB");
        assert_eq!(trimmed("   ", 0, 3), "");
    }

    #[test]
    fn test_span_at() {
        let text = "(;FF[4]\n;B[aa])";
        assert_eq!(Span::at(text, 0), Span { line: 1, column: 1, offset: 0 });
        assert_eq!(Span::at(text, 8), Span { line: 2, column: 1, offset: 8 });
        assert_eq!(Span::at(text, 10), Span { line: 2, column: 3, offset: 10 });
        assert_eq!(Span::at(text, 100).offset, text.len());
    }

    #[test]
    fn test_span_counts_chars() {
        let text = "C[é]x";
        assert_eq!(Span::at(text, 5).column, 5);
    }
}
