#![forbid(unsafe_code)]

//! Width-aware word wrapping.
//!
//! Wrapping respects grapheme cluster boundaries and cell widths (CJK and
//! emoji are two cells wide). Words that do not fit on a line of their own
//! are broken at grapheme boundaries.
//!
//! # Example
//! ```
//! use liveterm_document::wrap::wrap;
//!
//! let lines = wrap("This is a test message", 10);
//! assert_eq!(lines, vec!["This is a", "test", "message"]);
//! ```

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Wrap `text` into lines at most `width` cells wide.
///
/// Embedded newlines always start a new line, empty lines included. Trailing
/// whitespace is trimmed from every produced line. Always returns at least
/// one line. A `width` of zero yields a single empty line.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let start = lines.len();
        wrap_paragraph(paragraph, width, &mut lines);
        if lines.len() == start {
            lines.push(String::new());
        }
    }
    lines
}

/// Wrap a single paragraph (no embedded newlines).
fn wrap_paragraph(text: &str, width: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0;

    for word in split_words(text) {
        let word_width = word.width();

        if current_width + word_width <= width {
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        let pending = current.trim_end();
        if !pending.is_empty() {
            lines.push(pending.to_string());
        }
        current.clear();
        current_width = 0;

        let word = word.trim_start();
        if word.width() > width {
            wrap_long_word(word, width, lines, &mut current, &mut current_width);
        } else {
            current.push_str(word);
            current_width = word.width();
        }
    }

    if !current.trim_end().is_empty() {
        lines.push(current.trim_end().to_string());
    }
}

/// Break a word wider than the line at grapheme boundaries.
fn wrap_long_word(
    word: &str,
    width: usize,
    lines: &mut Vec<String>,
    current: &mut String,
    current_width: &mut usize,
) {
    for grapheme in word.graphemes(true) {
        let grapheme_width = grapheme.width();
        if *current_width + grapheme_width > width && !current.is_empty() {
            lines.push(std::mem::take(current));
            *current_width = 0;
        }
        current.push_str(grapheme);
        *current_width += grapheme_width;
    }
}

/// Split into alternating runs of whitespace and non-whitespace.
fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut in_whitespace = None;

    for (offset, grapheme) in text.grapheme_indices(true) {
        let is_ws = grapheme.chars().all(char::is_whitespace);
        if in_whitespace.is_some_and(|prev| prev != is_ws) {
            words.push(&text[start..offset]);
            start = offset;
        }
        in_whitespace = Some(is_ws);
    }

    if start < text.len() {
        words.push(&text[start..]);
    }
    words
}

/// Truncate text to fit within a width, never splitting a grapheme.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for grapheme in text.graphemes(true) {
        let grapheme_width = grapheme.width();
        if current_width + grapheme_width > max_width {
            break;
        }
        result.push_str(grapheme);
        current_width += grapheme_width;
    }

    result
}

/// Display width of text in cells.
#[inline]
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.width()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(wrap("Hello world foo bar", 10), vec!["Hello", "world foo", "bar"]);
    }

    #[test]
    fn fits_on_one_line() {
        assert_eq!(wrap("Hello world!", 13), vec!["Hello world!"]);
    }

    #[test]
    fn long_word_breaks_at_graphemes() {
        assert_eq!(
            wrap("Supercalifragilistic", 10),
            vec!["Supercalif", "ragilistic"]
        );
    }

    #[test]
    fn long_word_after_short_word() {
        assert_eq!(wrap("a abcdefghijkl", 5), vec!["a", "abcde", "fghij", "kl"]);
    }

    #[test]
    fn leading_whitespace_does_not_add_blank_line() {
        assert_eq!(wrap("  ab", 3), vec!["ab"]);
    }

    #[test]
    fn keeps_empty_lines() {
        assert_eq!(wrap("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn empty_text_is_one_line() {
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("   ", 10), vec![""]);
    }

    #[test]
    fn zero_width() {
        assert_eq!(wrap("abc", 0), vec![""]);
    }

    #[test]
    fn wide_characters_count_two_cells() {
        assert_eq!(wrap("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn truncate_respects_wide_chars() {
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(truncate_to_width("abc", 10), "abc");
    }

    #[test]
    fn split_words_alternates() {
        assert_eq!(split_words("a  bc d"), vec!["a", "  ", "bc", " ", "d"]);
        assert!(split_words("").is_empty());
    }
}
