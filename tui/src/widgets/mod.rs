//! Widgets and text helpers shared by the panes

mod text_block;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub use text_block::{TextBlock, TextBlockState, STREAM_CURSOR};

/// Cut `text` to at most `width` terminal columns, marking the cut with `…`
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Terminal columns taken by `text`
pub fn columns(text: &str) -> usize {
    text.width()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_leaves_short_text_alone() {
        assert_eq!(fit("Inbox", 10), "Inbox");
        assert_eq!(fit("Inbox", 5), "Inbox");
    }

    #[test]
    fn test_fit_truncates_with_ellipsis() {
        assert_eq!(fit("Harbor Trucking", 8), "Harbor …");
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn test_fit_counts_wide_chars() {
        // Each CJK char is two columns
        assert_eq!(fit("日本語", 4), "日…");
        assert_eq!(columns("日本語"), 6);
    }
}
