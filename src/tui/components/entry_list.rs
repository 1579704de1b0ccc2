//! # EntryList Component
//!
//! The View screen's picker: a numbered list of entry file names with a
//! highlighted row.
//!
//! The list is a snapshot handed in at construction. Moving past either end
//! stops at the first/last row; an empty list renders its title and nothing
//! else.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, HighlightSpacing, List, ListItem, ListState, Padding};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::style::Palette;

pub const TITLE: &str = "Pick a entry:";
const HIGHLIGHT_SYMBOL: &str = "> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryListEvent {
    Moved,
    /// Enter on a row; carries the entry's file name.
    Chosen(String),
}

pub struct EntryList {
    entries: Vec<String>,
    list_state: ListState,
    title_style: Style,
    highlight_style: Style,
}

impl EntryList {
    pub fn new(entries: Vec<String>, palette: &Palette) -> Self {
        let mut list_state = ListState::default();
        if !entries.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            entries,
            list_state,
            title_style: palette.primary_style().add_modifier(Modifier::BOLD),
            highlight_style: palette.primary_style(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.cursor()
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    fn step(&mut self, forward: bool) -> Option<EntryListEvent> {
        let current = self.cursor()?;
        let last = self.entries.len().saturating_sub(1);
        let next = if forward {
            (current + 1).min(last)
        } else {
            current.saturating_sub(1)
        };
        (next != current).then(|| {
            self.list_state.select(Some(next));
            EntryListEvent::Moved
        })
    }
}

impl EventHandler for EntryList {
    type Event = EntryListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp | TuiEvent::InputChar('k') => self.step(false),
            TuiEvent::CursorDown | TuiEvent::InputChar('j') => self.step(true),
            TuiEvent::Home | TuiEvent::InputChar('g') => {
                self.cursor()
                    .filter(|&i| i != 0)
                    .map(|_| {
                        self.list_state.select(Some(0));
                        EntryListEvent::Moved
                    })
            }
            TuiEvent::End | TuiEvent::InputChar('G') => {
                let last = self.entries.len().checked_sub(1)?;
                self.cursor().filter(|&i| i != last).map(|_| {
                    self.list_state.select(Some(last));
                    EntryListEvent::Moved
                })
            }
            TuiEvent::Enter => self
                .selected_name()
                .map(|name| EntryListEvent::Chosen(name.to_string())),
            _ => None,
        }
    }
}

impl Component for EntryList {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, name)| ListItem::new(format!("{}. {}", i + 1, name)))
            .collect();

        let block = Block::default()
            .title(Line::styled(TITLE, self.title_style))
            .padding(Padding::top(1));

        let list = List::new(items)
            .block(block)
            .highlight_symbol(HIGHLIGHT_SYMBOL)
            .highlight_style(self.highlight_style)
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}
