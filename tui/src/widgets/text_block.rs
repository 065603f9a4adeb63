//! TextBlock Widget
//!
//! A borderless, scrollable, word-wrapped text region. Used for the reader
//! body and the draft box; the draft box asks for a trailing cursor while a
//! reply is being revealed.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

/// Block cursor drawn after streaming text
pub const STREAM_CURSOR: char = '▍';

/// State for a scrollable text block
#[derive(Debug, Default)]
pub struct TextBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines
    pub total_lines: usize,
}

impl TextBlockState {
    /// Scroll by delta (positive = down)
    pub fn scroll(&mut self, delta: i32) {
        self.scroll_offset = if delta < 0 {
            self.scroll_offset.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.scroll_offset.saturating_add(delta as usize)
        };
    }

    /// Back to the top
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }
}

/// A borderless, scrollable text block
pub struct TextBlock<'a> {
    content: &'a str,
    style: Style,
    cursor: bool,
}

impl<'a> TextBlock<'a> {
    /// Block over `content`
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            style: Style::default(),
            cursor: false,
        }
    }

    /// Text style
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Draw a cursor after the last character
    #[must_use]
    pub fn cursor(mut self, cursor: bool) -> Self {
        self.cursor = cursor;
        self
    }

    /// Wrapped lines for a given width
    pub fn lines(&self, width: u16) -> Vec<String> {
        let mut text = self.content.to_string();
        if self.cursor {
            text.push(STREAM_CURSOR);
        }
        let width = usize::from(width.max(1));
        text.lines()
            .flat_map(|line| {
                if line.is_empty() {
                    vec![String::new()]
                } else {
                    wrap(line, width)
                        .into_iter()
                        .map(|cow| cow.to_string())
                        .collect()
                }
            })
            .collect()
    }
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let wrapped = self.lines(area.width);

        state.total_lines = wrapped.len();

        // Clamp scroll
        let max_scroll = state.total_lines.saturating_sub(area.height as usize);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        // Render visible lines
        for (i, line) in wrapped
            .iter()
            .skip(state.scroll_offset)
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + i as u16;
            buf.set_string(area.x, y, line, self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_and_counts_lines() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        let mut state = TextBlockState::default();

        TextBlock::new("one two three four").render(area, &mut buf, &mut state);

        assert_eq!(state.total_lines, 2);
        assert_eq!(buf[(0, 0)].symbol(), "o");
        assert_eq!(buf[(0, 1)].symbol(), "t");
    }

    #[test]
    fn test_scroll_is_clamped() {
        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);
        let mut state = TextBlockState::default();
        state.scroll(50);

        TextBlock::new("a\nb\nc").render(area, &mut buf, &mut state);

        assert_eq!(state.scroll_offset, 2);
        assert_eq!(buf[(0, 0)].symbol(), "c");

        state.scroll(-10);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn test_cursor_follows_text() {
        let lines = TextBlock::new("Hi").cursor(true).lines(20);
        assert_eq!(lines, vec![format!("Hi{STREAM_CURSOR}")]);
    }
}
