//! # TextArea Component
//!
//! Multi-line editor used by the Write screen.
//!
//! ## Responsibilities
//!
//! - Own the text buffer and the cursor inside it
//! - Editing: insert, paste, backspace, delete, newline
//! - Movement: by char, by word, across wrapped rows, home/end of line
//! - Focus and blur, with a blinking cursor while focused
//! - Show a placeholder when the buffer is empty
//!
//! The area is drawn at the size given to `new`, clipped to whatever the
//! parent hands to `render`. A thick bar on the left marks it,
//! bright when focused and dim when blurred.

mod cursor;
mod text_wrap;

use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::program::{Command, Message};
use crate::tui::style::Palette;

use cursor::CursorState;
use text_wrap::{
    inner_width, next_char_boundary, next_word_boundary, prev_char_boundary, prev_word_boundary,
    wrapped_rows,
};

/// How long the cursor stays on (or off) while focused.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(530);

/// What an input did to the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAreaEvent {
    /// The buffer changed.
    Edited,
    /// Only the cursor moved.
    Moved,
}

#[derive(Debug, Clone, Copy)]
struct TextAreaStyle {
    text: Style,
    placeholder: Style,
    bar_focused: Style,
    bar_blurred: Style,
}

impl TextAreaStyle {
    fn from_palette(palette: &Palette) -> Self {
        Self {
            text: Style::default().fg(palette.text),
            placeholder: palette.dim_style(),
            bar_focused: palette.primary_style(),
            bar_blurred: palette.dim_style(),
        }
    }
}

pub struct TextArea {
    buffer: String,
    cursor: CursorState,
    placeholder: String,
    width: u16,
    height: u16,
    focused: bool,
    cursor_visible: bool,
    /// Bumped on every focus change; blink ticks from an older generation are dropped.
    blink_generation: u64,
    style: TextAreaStyle,
}

impl TextArea {
    pub fn new(width: u16, height: u16, palette: &Palette) -> Self {
        Self {
            buffer: String::new(),
            cursor: CursorState::new(width),
            placeholder: String::new(),
            width,
            height,
            focused: false,
            cursor_visible: false,
            blink_generation: 0,
            style: TextAreaStyle::from_palette(palette),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// Replace the buffer and put the cursor after the last character.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.buffer = value.into();
        self.cursor.move_to_end(&self.buffer);
        self.cursor.scroll_offset = 0;
    }

    /// True when the buffer holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn cursor_visible(&self) -> bool {
        self.focused && self.cursor_visible
    }

    /// Take keystrokes and start blinking. Returns the first blink timer.
    pub fn focus(&mut self) -> Command {
        self.focused = true;
        self.cursor_visible = true;
        self.blink_generation += 1;
        Command::tick(BLINK_INTERVAL, Message::CursorBlink(self.blink_generation))
    }

    /// Stop taking keystrokes. Any pending blink tick goes stale.
    pub fn blur(&mut self) {
        self.focused = false;
        self.cursor_visible = false;
        self.blink_generation += 1;
    }

    /// Toggle the cursor and re-arm, unless the tick is stale.
    pub fn on_blink(&mut self, generation: u64) -> Command {
        if !self.focused || generation != self.blink_generation {
            return Command::None;
        }
        self.cursor_visible = !self.cursor_visible;
        Command::tick(BLINK_INTERVAL, Message::CursorBlink(generation))
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
    }

    fn line_start(&self) -> usize {
        self.buffer[..self.cursor.pos]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    fn line_end(&self) -> usize {
        self.buffer[self.cursor.pos..]
            .find('\n')
            .map(|i| self.cursor.pos + i)
            .unwrap_or(self.buffer.len())
    }

    fn move_to(&mut self, pos: usize) -> Option<TextAreaEvent> {
        (pos != self.cursor.pos).then(|| {
            self.cursor.pos = pos;
            TextAreaEvent::Moved
        })
    }

    fn visible_lines(&self, area: Rect) -> Vec<Line<'static>> {
        if self.buffer.is_empty() {
            return vec![Line::from(Span::styled(
                self.placeholder.clone(),
                self.style.placeholder,
            ))];
        }
        wrapped_rows(&self.buffer, inner_width(area.width))
            .into_iter()
            .skip(self.cursor.scroll_offset as usize)
            .take(area.height as usize)
            .map(|row| Line::from(Span::styled(row, self.style.text)))
            .collect()
    }
}

impl Component for TextArea {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let area = Rect {
            width: area.width.min(self.width),
            height: area.height.min(self.height),
            ..area
        };
        if area.width == 0 || area.height == 0 {
            return;
        }

        self.cursor.last_area_width = area.width;
        self.cursor
            .update_scroll_offset(&self.buffer, area.width, area.height);

        let bar_style = if self.focused {
            self.style.bar_focused
        } else {
            self.style.bar_blurred
        };
        let block = Block::default()
            .borders(Borders::LEFT)
            .border_type(BorderType::Thick)
            .border_style(bar_style)
            .padding(Padding::left(1));

        frame.render_widget(Paragraph::new(self.visible_lines(area)).block(block), area);

        if self.cursor_visible() {
            frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
        }
    }
}

impl EventHandler for TextArea {
    type Event = TextAreaEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        // Any keystroke shows the cursor immediately
        self.cursor_visible = self.focused;

        match event {
            TuiEvent::InputChar(c) => {
                let mut encoded = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut encoded));
                Some(TextAreaEvent::Edited)
            }
            TuiEvent::Enter => {
                self.insert_str("\n");
                Some(TextAreaEvent::Edited)
            }
            TuiEvent::Paste(text) => {
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert_str(&text);
                Some(TextAreaEvent::Edited)
            }
            TuiEvent::Backspace => (self.cursor.pos > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                TextAreaEvent::Edited
            }),
            TuiEvent::Delete => (self.cursor.pos < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                TextAreaEvent::Edited
            }),
            TuiEvent::CursorLeft => {
                self.move_to(prev_char_boundary(&self.buffer, self.cursor.pos))
            }
            TuiEvent::CursorRight => {
                self.move_to(next_char_boundary(&self.buffer, self.cursor.pos))
            }
            TuiEvent::WordLeft => self.move_to(prev_word_boundary(&self.buffer, self.cursor.pos)),
            TuiEvent::WordRight => self.move_to(next_word_boundary(&self.buffer, self.cursor.pos)),
            TuiEvent::Home => self.move_to(self.line_start()),
            TuiEvent::End => self.move_to(self.line_end()),
            TuiEvent::CursorUp => self
                .cursor
                .move_vertically(&self.buffer, -1)
                .then_some(TextAreaEvent::Moved),
            TuiEvent::CursorDown => self
                .cursor
                .move_vertically(&self.buffer, 1)
                .then_some(TextAreaEvent::Moved),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{buffer_text, draw};

    fn area() -> TextArea {
        TextArea::new(50, 15, &Palette::default()).with_placeholder("How was your today?")
    }

    fn type_str(ta: &mut TextArea, s: &str) {
        for c in s.chars() {
            ta.handle_event(&TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn typing_and_backspace() {
        let mut ta = area();
        type_str(&mut ta, "hallo");
        assert_eq!(ta.value(), "hallo");

        ta.handle_event(&TuiEvent::CursorLeft);
        ta.handle_event(&TuiEvent::CursorLeft);
        ta.handle_event(&TuiEvent::CursorLeft);
        assert_eq!(ta.handle_event(&TuiEvent::Backspace), Some(TextAreaEvent::Edited));
        ta.handle_event(&TuiEvent::InputChar('e'));
        assert_eq!(ta.value(), "hello");
    }

    #[test]
    fn enter_inserts_newline_and_home_end_are_per_line() {
        let mut ta = area();
        type_str(&mut ta, "one");
        ta.handle_event(&TuiEvent::Enter);
        type_str(&mut ta, "two");
        assert_eq!(ta.value(), "one\ntwo");

        ta.handle_event(&TuiEvent::Home);
        ta.handle_event(&TuiEvent::InputChar('>'));
        assert_eq!(ta.value(), "one\n>two");

        ta.handle_event(&TuiEvent::CursorUp);
        ta.handle_event(&TuiEvent::End);
        ta.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(ta.value(), "one!\n>two");
    }

    #[test]
    fn paste_normalizes_line_endings() {
        let mut ta = area();
        ta.handle_event(&TuiEvent::Paste("a\r\nb\rc".into()));
        assert_eq!(ta.value(), "a\nb\nc");
    }

    #[test]
    fn up_and_down_cross_a_soft_wrap() {
        let mut ta = TextArea::new(8, 3, &Palette::default());
        ta.set_value("aaaa bbbb");
        assert_eq!(ta.handle_event(&TuiEvent::CursorDown), None);

        assert_eq!(ta.handle_event(&TuiEvent::CursorUp), Some(TextAreaEvent::Moved));
        ta.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(ta.value(), "aaaa! bbbb");

        assert_eq!(ta.handle_event(&TuiEvent::CursorDown), Some(TextAreaEvent::Moved));
        ta.handle_event(&TuiEvent::InputChar('?'));
        assert_eq!(ta.value(), "aaaa! bbbb?");
    }

    #[test]
    fn delete_at_end_is_noop() {
        let mut ta = area();
        ta.set_value("abc");
        assert_eq!(ta.handle_event(&TuiEvent::Delete), None);
        assert_eq!(ta.handle_event(&TuiEvent::CursorRight), None);
        ta.handle_event(&TuiEvent::WordLeft);
        assert_eq!(ta.handle_event(&TuiEvent::Delete), Some(TextAreaEvent::Edited));
        assert_eq!(ta.value(), "bc");
    }

    #[test]
    fn blank_detection() {
        let mut ta = area();
        assert!(ta.is_blank());
        ta.set_value(" \n\t ");
        assert!(ta.is_blank());
        ta.set_value(" x ");
        assert!(!ta.is_blank());
    }

    #[test]
    fn blink_ignores_stale_generations() {
        let mut ta = area();
        let first = match ta.focus() {
            Command::Tick(_, Message::CursorBlink(generation)) => generation,
            other => panic!("expected blink tick, got {other:?}"),
        };
        assert!(ta.cursor_visible());
        assert!(matches!(ta.on_blink(first), Command::Tick(..)));
        assert!(!ta.cursor_visible());

        ta.blur();
        assert!(ta.on_blink(first).is_none());

        let second = match ta.focus() {
            Command::Tick(_, Message::CursorBlink(generation)) => generation,
            other => panic!("expected blink tick, got {other:?}"),
        };
        assert_ne!(first, second);
        assert!(ta.on_blink(first).is_none());
        assert!(ta.cursor_visible());
    }

    #[test]
    fn renders_placeholder_when_empty() {
        let mut ta = area();
        let text = buffer_text(&draw(60, 5, |f| ta.render(f, f.area())));
        assert!(text.contains("┃ How was your today?"), "got: {text}");
    }

    #[test]
    fn renders_value_and_scrolls_to_cursor() {
        let mut ta = TextArea::new(50, 2, &Palette::default());
        ta.set_value("first\nsecond\nthird");
        let text = buffer_text(&draw(60, 5, |f| ta.render(f, f.area())));
        assert!(!text.contains("first"), "got: {text}");
        assert!(text.contains("second"));
        assert!(text.contains("third"));
    }
}
