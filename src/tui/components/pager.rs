//! # Pager Component
//!
//! A vertically scrolling viewport over pre-rendered styled text.
//!
//! The pager's size comes from the owning screen (terminal width by height
//! minus decorations) and defaults to 78 x 20 until the first resize. Content
//! is wrapped to the pager width; the offset is always clamped so the last
//! page is full when the content is taller than the viewport.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const DEFAULT_WIDTH: u16 = 78;
pub const DEFAULT_HEIGHT: u16 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerEvent {
    Scrolled,
}

pub struct Pager {
    width: u16,
    height: u16,
    content: Text<'static>,
    /// Wrapped line count of `content` at `width`.
    content_height: u16,
    offset: u16,
    scroll_state: ScrollViewState,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Pager {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            content: Text::default(),
            content_height: 0,
            offset: 0,
            scroll_state: ScrollViewState::default(),
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.content_height = self.measure();
        self.clamp();
    }

    pub fn content(&self) -> &Text<'static> {
        &self.content
    }

    /// Replace the content and go back to the top.
    pub fn set_content(&mut self, content: Text<'static>) {
        self.content = content;
        self.content_height = self.measure();
        self.offset = 0;
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn content_height(&self) -> u16 {
        self.content_height
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.height)
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }

    fn measure(&self) -> u16 {
        if self.width == 0 || self.content.lines.is_empty() {
            return 0;
        }
        let lines = self.paragraph().line_count(self.width);
        u16::try_from(lines).unwrap_or(u16::MAX)
    }

    fn paragraph(&self) -> Paragraph<'static> {
        Paragraph::new(self.content.clone()).wrap(Wrap { trim: false })
    }

    fn scroll_to(&mut self, offset: u16) -> Option<PagerEvent> {
        let offset = offset.min(self.max_offset());
        (offset != self.offset).then(|| {
            self.offset = offset;
            PagerEvent::Scrolled
        })
    }

    pub fn scroll_down(&mut self, lines: u16) -> Option<PagerEvent> {
        self.scroll_to(self.offset.saturating_add(lines))
    }

    pub fn scroll_up(&mut self, lines: u16) -> Option<PagerEvent> {
        self.scroll_to(self.offset.saturating_sub(lines))
    }

    pub fn page_down(&mut self) -> Option<PagerEvent> {
        self.scroll_down(self.height.max(1))
    }

    pub fn page_up(&mut self) -> Option<PagerEvent> {
        self.scroll_up(self.height.max(1))
    }
}

impl EventHandler for Pager {
    type Event = PagerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp | TuiEvent::InputChar('k') => self.scroll_up(1),
            TuiEvent::CursorDown | TuiEvent::InputChar('j') => self.scroll_down(1),
            TuiEvent::PageUp | TuiEvent::InputChar('b') => self.page_up(),
            TuiEvent::PageDown | TuiEvent::InputChar('f' | ' ') => self.page_down(),
            TuiEvent::InputChar('u') => self.scroll_up(self.height / 2),
            TuiEvent::InputChar('d') => self.scroll_down(self.height / 2),
            TuiEvent::Home | TuiEvent::InputChar('g') => self.scroll_to(0),
            TuiEvent::End | TuiEvent::InputChar('G') => self.scroll_to(self.max_offset()),
            _ => None,
        }
    }
}

impl Component for Pager {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let area = Rect {
            width: area.width.min(self.width),
            height: area.height.min(self.height),
            ..area
        };
        if area.width == 0 || area.height == 0 || self.content_height == 0 {
            return;
        }

        let mut scroll_view = ScrollView::new(Size::new(self.width, self.content_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Never)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            self.paragraph(),
            Rect::new(0, 0, self.width, self.content_height),
        );

        self.scroll_state.set_offset(Position {
            x: 0,
            y: self.offset,
        });
        frame.render_stateful_widget(scroll_view, area, &mut self.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{buffer_text, draw};

    fn numbered(n: usize) -> Text<'static> {
        Text::from(
            (1..=n)
                .map(|i| format!("line {i}"))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    #[test]
    fn defaults_before_any_resize() {
        assert_eq!(Pager::default().size(), (78, 20));
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut pager = Pager::new(20, 4);
        pager.set_content(numbered(10));
        assert_eq!(pager.content_height(), 10);

        assert_eq!(pager.scroll_up(1), None);
        assert_eq!(pager.page_down(), Some(PagerEvent::Scrolled));
        assert_eq!(pager.offset(), 4);
        assert_eq!(pager.handle_event(&TuiEvent::End), Some(PagerEvent::Scrolled));
        assert_eq!(pager.offset(), 6);
        assert_eq!(pager.scroll_down(1), None);
        assert_eq!(pager.offset(), 6);
        assert_eq!(pager.handle_event(&TuiEvent::InputChar('g')), Some(PagerEvent::Scrolled));
        assert_eq!(pager.offset(), 0);
    }

    #[test]
    fn new_content_resets_offset() {
        let mut pager = Pager::new(20, 4);
        pager.set_content(numbered(10));
        pager.scroll_down(3);
        pager.set_content(numbered(10));
        assert_eq!(pager.offset(), 0);
    }

    #[test]
    fn growing_viewport_reclamps_offset() {
        let mut pager = Pager::new(20, 4);
        pager.set_content(numbered(10));
        pager.scroll_to(6);
        pager.set_size(20, 8);
        assert_eq!(pager.offset(), 2);
    }

    #[test]
    fn long_lines_wrap_to_width() {
        let mut pager = Pager::new(10, 4);
        pager.set_content(Text::from("aaaaa bbbbb ccccc"));
        assert_eq!(pager.content_height(), 3);
    }

    #[test]
    fn zero_height_and_empty_content_render_nothing() {
        let mut pager = Pager::new(20, 0);
        pager.set_content(numbered(3));
        let text = buffer_text(&draw(20, 3, |f| pager.render(f, f.area())));
        assert!(text.trim().is_empty());

        let mut empty = Pager::new(20, 3);
        empty.set_content(Text::default());
        assert_eq!(empty.content_height(), 0);
        let text = buffer_text(&draw(20, 3, |f| empty.render(f, f.area())));
        assert!(text.trim().is_empty());
    }

    #[test]
    fn renders_from_offset() {
        let mut pager = Pager::new(20, 3);
        pager.set_content(numbered(10));
        pager.scroll_down(2);
        let text = buffer_text(&draw(20, 3, |f| pager.render(f, f.area())));
        let rows: Vec<&str> = text.lines().map(str::trim_end).collect();
        assert_eq!(rows, vec!["line 3", "line 4", "line 5"]);
    }
}
