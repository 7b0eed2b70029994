//! Display-width measurement for content lines.
//!
//! Lines are treated as opaque: embedded escape sequences are copied through
//! untouched and count as zero columns. Truncation never splits a grapheme.

use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ESC: u8 = 0x1B;

/// Strip ANSI escape sequences from a string.
///
/// Returns `Cow::Borrowed` when no escape sequences are present.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.as_bytes().contains(&ESC) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for segment in segments(s) {
        if let Segment::Text(text) = segment {
            result.push_str(text);
        }
    }
    Cow::Owned(result)
}

/// Display width in terminal columns, ignoring escape sequences.
pub fn display_width(s: &str) -> usize {
    strip_ansi(s).width()
}

/// Fit a line to exactly `width` columns: truncate at a grapheme boundary or
/// pad with spaces. Escape sequences are preserved; if any were present a
/// reset is appended so styling cannot leak past the line.
pub fn fit_width(s: &str, width: usize) -> String {
    let mut out = String::with_capacity(s.len().max(width));
    let mut used = 0usize;
    let mut saw_escape = false;

    'outer: for segment in segments(s) {
        match segment {
            Segment::Escape(seq) => {
                saw_escape = true;
                out.push_str(seq);
            }
            Segment::Text(text) => {
                for grapheme in text.graphemes(true) {
                    // Control characters would move the cursor.
                    if grapheme.chars().any(char::is_control) {
                        continue;
                    }
                    let w = grapheme.width();
                    if used + w > width {
                        break 'outer;
                    }
                    out.push_str(grapheme);
                    used += w;
                }
            }
        }
    }

    if saw_escape {
        out.push_str(crate::style::RESET);
    }
    out.extend(std::iter::repeat(' ').take(width - used));
    out
}

enum Segment<'a> {
    Text(&'a str),
    Escape(&'a str),
}

/// Split a string into runs of text and complete escape sequences.
fn segments(s: &str) -> impl Iterator<Item = Segment<'_>> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos >= bytes.len() {
            return None;
        }
        let start = pos;
        if bytes[pos] == ESC {
            pos = skip_escape_sequence(bytes, pos);
            Some(Segment::Escape(&s[start..pos]))
        } else {
            // ESC is a single-byte character, so these slices stay on UTF-8 boundaries.
            while pos < bytes.len() && bytes[pos] != ESC {
                pos += 1;
            }
            Some(Segment::Text(&s[start..pos]))
        }
    })
}

/// Returns the byte index after the escape sequence starting at `pos`.
fn skip_escape_sequence(bytes: &[u8], pos: usize) -> usize {
    let next = pos + 1;
    if next >= bytes.len() {
        return bytes.len();
    }

    match bytes[next] {
        b'[' => skip_csi(bytes, next + 1),
        b']' | b'P' | b'^' | b'_' => skip_string_terminated(bytes, next + 1),
        b if b.is_ascii() => next + 1,
        // Never split a multi-byte character after a stray ESC.
        _ => next,
    }
}

fn skip_csi(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos;
    while i < bytes.len() {
        let b = bytes[i];
        if (0x40..=0x7E).contains(&b) {
            return i + 1;
        }
        if !(0x20..=0x7E).contains(&b) {
            return i;
        }
        i += 1;
    }
    bytes.len()
}

fn skip_string_terminated(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos;
    while i < bytes.len() {
        match bytes[i] {
            0x07 => return i + 1,
            ESC if i + 1 < bytes.len() && bytes[i + 1] == b'\\' => return i + 2,
            _ => i += 1,
        }
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_borrowed_without_escapes() {
        assert!(matches!(strip_ansi("hello"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_csi_and_osc() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(strip_ansi("\x1b]0;title\x07text"), "text");
    }

    #[test]
    fn test_display_width_wide_chars() {
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width("\x1b[1mab\x1b[0m"), 2);
    }

    #[test]
    fn test_fit_pads_short_lines() {
        assert_eq!(fit_width("ab", 4), "ab  ");
    }

    #[test]
    fn test_fit_truncates_at_grapheme() {
        assert_eq!(fit_width("日本語", 5), "日本 ");
        assert_eq!(fit_width("hello world", 5), "hello");
    }

    #[test]
    fn test_fit_keeps_escapes_and_resets() {
        let fitted = fit_width("\x1b[31mredder\x1b[0m", 3);
        assert_eq!(fitted, "\x1b[31mred\x1b[0m");
        assert_eq!(display_width(&fitted), 3);
    }

    #[test]
    fn test_fit_drops_control_chars() {
        assert_eq!(fit_width("a\tb\n", 3), "ab ");
    }
}
