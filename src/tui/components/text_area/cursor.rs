//! Cursor position and viewport scrolling for the `TextArea`.
//!
//! The buffer itself lives in `TextArea`; every method here borrows it.

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::text_wrap::{RowSpan, TEXT_X_OFFSET, inner_width, row_index, row_spans, wrap_line_count};

pub(super) struct CursorState {
    /// Byte offset into the buffer, always on a char boundary.
    pub pos: usize,
    /// First wrapped row shown in the viewport.
    pub scroll_offset: u16,
    /// Area width from the last render, used by vertical movement.
    pub last_area_width: u16,
}

impl CursorState {
    pub fn new(area_width: u16) -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_area_width: area_width,
        }
    }

    pub fn move_to_end(&mut self, buffer: &str) {
        self.pos = buffer.len();
    }

    /// Move one wrapped row up (`direction < 0`) or down, keeping the display
    /// column where the target row is long enough. Returns `false` at the
    /// first/last row.
    pub fn move_vertically(&mut self, buffer: &str, direction: i16) -> bool {
        let width = inner_width(self.last_area_width);
        if width == 0 {
            return false;
        }

        let spans = row_spans(buffer, width);
        let current = row_index(&spans, self.pos);
        let target = if direction < 0 {
            match current.checked_sub(1) {
                Some(t) => t,
                None => return false,
            }
        } else if current + 1 >= spans.len() {
            return false;
        } else {
            current + 1
        };

        let column = buffer[spans[current].start..self.pos].width();
        self.pos = pos_at_column(buffer, spans[target], column);
        true
    }

    /// Wrapped row (0-based) holding the cursor.
    pub fn row(&self, buffer: &str, area_width: u16) -> u16 {
        let width = inner_width(area_width);
        if width == 0 {
            return 0;
        }
        row_index(&row_spans(buffer, width), self.pos) as u16
    }

    /// Keep the cursor row inside a viewport of `visible_rows`.
    pub fn update_scroll_offset(&mut self, buffer: &str, area_width: u16, visible_rows: u16) {
        let total = wrap_line_count(buffer, inner_width(area_width));
        if total <= visible_rows || visible_rows == 0 {
            self.scroll_offset = 0;
            return;
        }

        let row = self.row(buffer, area_width);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + visible_rows {
            self.scroll_offset = row + 1 - visible_rows;
        }
    }

    /// Terminal cell of the cursor inside `area`, as (column, row).
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        if width == 0 {
            return (area.x + TEXT_X_OFFSET.min(area.width), area.y);
        }

        let spans = row_spans(buffer, width);
        let row = row_index(&spans, self.pos);
        let column = buffer[spans[row].start..self.pos].width();
        let column = (column as u16).min(width);

        let visible_row = (row as u16).saturating_sub(self.scroll_offset);
        (area.x + TEXT_X_OFFSET + column, area.y + visible_row)
    }
}

/// First position on `span` whose display column reaches `column`, or the
/// row's last position when the row is shorter.
fn pos_at_column(buffer: &str, span: RowSpan, column: usize) -> usize {
    let mut width = 0;
    for (i, c) in buffer[span.start..span.last].char_indices() {
        width += c.width().unwrap_or(0);
        if width > column {
            return span.start + i;
        }
    }
    span.last
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_moves_across_newlines() {
        let buffer = "first\nsecond";
        let mut cursor = CursorState::new(50);
        cursor.pos = 8; // "se|cond"
        assert!(cursor.move_vertically(buffer, -1));
        assert_eq!(cursor.pos, 2);
        assert!(!cursor.move_vertically(buffer, -1));
        assert!(cursor.move_vertically(buffer, 1));
        assert_eq!(cursor.pos, 8);
        assert!(!cursor.move_vertically(buffer, 1));
    }

    #[test]
    fn vertical_move_clamps_to_short_row() {
        let buffer = "a\nlonger line";
        let mut cursor = CursorState::new(50);
        cursor.pos = buffer.len();
        assert!(cursor.move_vertically(buffer, -1));
        assert_eq!(cursor.pos, 1);
    }

    #[test]
    fn vertical_moves_across_a_soft_wrap() {
        // Inner width 6: rows "aaaa" and "bbbb", the space swallowed by the break
        let buffer = "aaaa bbbb";
        let mut cursor = CursorState::new(8);
        cursor.pos = buffer.len();
        assert!(!cursor.move_vertically(buffer, 1), "already on the last row");
        assert_eq!(cursor.pos, 9);

        assert!(cursor.move_vertically(buffer, -1));
        assert_eq!(cursor.pos, 4);
        assert!(!cursor.move_vertically(buffer, -1));

        cursor.pos = 1;
        assert!(cursor.move_vertically(buffer, 1));
        assert_eq!(cursor.pos, 6);
    }

    #[test]
    fn vertical_moves_through_a_long_paragraph() {
        let buffer = "one two three four five six seven";
        let mut cursor = CursorState::new(12); // inner width 10
        cursor.pos = buffer.len();
        let mut rows_climbed = 0;
        while cursor.move_vertically(buffer, -1) {
            rows_climbed += 1;
        }
        assert_eq!(rows_climbed, 3);
        assert!(cursor.pos <= 7, "ended on the first row, got {}", cursor.pos);
        assert_eq!(cursor.row(buffer, 12), 0);
    }

    #[test]
    fn row_and_screen_pos_after_a_soft_wrap() {
        let area = Rect::new(0, 0, 8, 5);
        let buffer = "aaaa bbbb";
        let mut cursor = CursorState::new(8);
        cursor.pos = 7; // "bb|bb"
        assert_eq!(cursor.row(buffer, 8), 1);
        assert_eq!(cursor.screen_pos(buffer, area), (TEXT_X_OFFSET + 2, 1));

        cursor.pos = 5;
        assert_eq!(cursor.screen_pos(buffer, area), (TEXT_X_OFFSET, 1));
    }

    #[test]
    fn row_counts_trailing_newline() {
        let mut cursor = CursorState::new(50);
        cursor.pos = 6;
        assert_eq!(cursor.row("hello\n", 50), 1);
    }

    #[test]
    fn scroll_follows_cursor() {
        let buffer = "1\n2\n3\n4\n5";
        let mut cursor = CursorState::new(50);
        cursor.pos = buffer.len();
        cursor.update_scroll_offset(buffer, 50, 3);
        assert_eq!(cursor.scroll_offset, 2);

        cursor.pos = 0;
        cursor.update_scroll_offset(buffer, 50, 3);
        assert_eq!(cursor.scroll_offset, 0);
    }

    #[test]
    fn screen_pos_uses_display_width() {
        let area = Rect::new(0, 0, 50, 15);
        let mut cursor = CursorState::new(50);
        let buffer = "日本";
        cursor.pos = buffer.len();
        assert_eq!(cursor.screen_pos(buffer, area), (TEXT_X_OFFSET + 4, 0));
    }

    #[test]
    fn screen_pos_after_newline() {
        let area = Rect::new(3, 4, 50, 15);
        let mut cursor = CursorState::new(50);
        let buffer = "ab\n";
        cursor.pos = buffer.len();
        assert_eq!(cursor.screen_pos(buffer, area), (3 + TEXT_X_OFFSET, 5));
    }
}
