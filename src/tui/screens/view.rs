//! # View Screen
//!
//! Picker and pager over the entry files, one pane at a time.
//!
//! ```text
//!   picker ──Enter──► (read + render) ──► pager
//!     ▲                                      │
//!     └──────────────Tab / Esc───────────────┘
//! ```
//!
//! The entry list is scanned once when the screen opens. The last rendered
//! body is kept when going back to the picker, so choosing the same entry
//! again shows it without reading or rendering it a second time.
//!
//! A read failure stays on the picker with an inline error that clears
//! itself after two seconds.

use std::time::Duration;

use log::{debug, error, info};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::text::{Line, Text};
use ratatui::widgets::Paragraph;

use crate::core::entry::{EntryError, EntryStore};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::{EntryList, EntryListEvent, HelpLine, Pager};
use crate::tui::event::TuiEvent;
use crate::tui::program::{Command, Message, Model};
use crate::tui::render::Renderer;
use crate::tui::style::Palette;

pub const HELP: &[(&str, &str)] = &[("tab", "toggle list of entries"), ("ctrl+c", "quit")];
/// Rows above the pager (file name) and below it (help line).
pub const HEADER_HEIGHT: u16 = 1;
pub const FOOTER_HEIGHT: u16 = 1;
/// Blank cells around the whole screen, on every side. The pager gets what
/// is left: `width - 2 * MARGIN` by `height - HEADER_HEIGHT - FOOTER_HEIGHT - 2 * MARGIN`.
pub const MARGIN: u16 = 1;
const ERROR_TIMEOUT: Duration = Duration::from_secs(2);

pub struct ViewScreen {
    store: EntryStore,
    renderer: Box<dyn Renderer>,
    list: EntryList,
    picker_active: bool,
    selected_file: String,
    rendered_body: Text<'static>,
    pager: Pager,
    error: Option<String>,
    error_generation: u64,
    palette: Palette,
}

impl ViewScreen {
    /// Snapshot the store's entries. Failure to list the directory is fatal.
    pub fn open(
        store: EntryStore,
        renderer: Box<dyn Renderer>,
        palette: Palette,
    ) -> Result<Self, EntryError> {
        let entries = store.list_entries()?;
        info!(
            "View screen opened on {} ({} entries, renderer: {})",
            store.dir().display(),
            entries.len(),
            renderer.name()
        );
        Ok(Self {
            store,
            renderer,
            list: EntryList::new(entries, &palette),
            picker_active: true,
            selected_file: String::new(),
            rendered_body: Text::default(),
            pager: Pager::default(),
            error: None,
            error_generation: 0,
            palette,
        })
    }

    pub fn picker_active(&self) -> bool {
        self.picker_active
    }

    pub fn selected_file(&self) -> &str {
        &self.selected_file
    }

    pub fn rendered_body(&self) -> &Text<'static> {
        &self.rendered_body
    }

    pub fn entries(&self) -> &[String] {
        self.list.entries()
    }

    pub fn list_cursor(&self) -> Option<usize> {
        self.list.cursor()
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn choose(&mut self, name: String) -> Command {
        if name == self.selected_file {
            debug!("Reopening {} without re-rendering", name);
            self.picker_active = false;
            return Command::None;
        }
        let store = self.store.clone();
        Command::perform(move || {
            let result = store.read(&name);
            Message::EntryLoaded { name, result }
        })
    }

    fn loaded(&mut self, name: String, result: Result<String, EntryError>) -> Command {
        match result {
            Ok(body) => {
                self.rendered_body = self.renderer.render(&body);
                self.pager.set_content(self.rendered_body.clone());
                info!("Showing {} ({} lines)", name, self.pager.content_height());
                self.selected_file = name;
                self.picker_active = false;
                self.error = None;
                Command::None
            }
            Err(e) => {
                error!("Failed to read {}: {}", name, e);
                self.error = Some(e.to_string());
                self.error_generation += 1;
                Command::tick(ERROR_TIMEOUT, Message::ClearError(self.error_generation))
            }
        }
    }

    fn handle_input(&mut self, event: TuiEvent) -> Command {
        if event == TuiEvent::Interrupt {
            return Command::Quit;
        }

        if self.picker_active {
            match self.list.handle_event(&event) {
                Some(EntryListEvent::Chosen(name)) => self.choose(name),
                _ => Command::None,
            }
        } else {
            match event {
                TuiEvent::Tab | TuiEvent::Escape => {
                    self.picker_active = true;
                }
                other => {
                    self.pager.handle_event(&other);
                }
            }
            Command::None
        }
    }

    fn render_picker(&mut self, frame: &mut Frame, area: Rect) {
        let [list_area, error_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        self.list.render(frame, list_area);
        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Line::styled(error.as_str(), self.palette.error_style())),
                error_area,
            );
        }
    }

    fn render_pager(&mut self, frame: &mut Frame, area: Rect) {
        let [header_area, pager_area, help_area] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Line::styled(
                self.selected_file.as_str(),
                self.palette.primary_style(),
            )),
            header_area,
        );
        self.pager.render(frame, pager_area);
        HelpLine::new(HELP, self.palette.dim_style()).render(frame, help_area);
    }
}

impl Model for ViewScreen {
    fn update(&mut self, message: Message) -> Command {
        match message {
            Message::Input(event) => self.handle_input(event),
            Message::Resize { width, height } => {
                let chrome = HEADER_HEIGHT + FOOTER_HEIGHT + 2 * MARGIN;
                self.pager
                    .set_size(width.saturating_sub(2 * MARGIN), height.saturating_sub(chrome));
                Command::None
            }
            Message::EntryLoaded { name, result } => self.loaded(name, result),
            Message::ClearError(generation) => {
                if generation == self.error_generation {
                    self.error = None;
                }
                Command::None
            }
            Message::CursorBlink(_)
            | Message::ClearStatus(_)
            | Message::Saved(_)
            | Message::ExitHookDone(_) => Command::None,
        }
    }

    fn view(&mut self, frame: &mut Frame) {
        let area = frame.area().inner(Margin::new(MARGIN, MARGIN));
        if self.picker_active {
            self.render_picker(frame, area);
        } else {
            self.render_pager(frame, area);
        }
    }
}
