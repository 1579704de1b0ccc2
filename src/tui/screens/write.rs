//! # Write Screen
//!
//! Today's entry in a text area, with save on Ctrl+S and save-or-delete on
//! Ctrl+C.
//!
//! ## Focus
//!
//! | Key       | focused                  | blurred                    |
//! |-----------|--------------------------|----------------------------|
//! | Esc       | blur                     | -                          |
//! | Enter     | newline                  | focus                      |
//! | Ctrl+S    | save                     | save                       |
//! | Ctrl+C    | save or delete, then quit| save or delete, then quit  |
//! | other     | to the text area         | focus, then to the text area |
//!
//! ## Status line
//!
//! A save sets the status and arms a `ClearStatus` timer tagged with a fresh
//! generation. Only the timer from the latest save blanks the line, so saving
//! twice in a row keeps the status up until two seconds after the second save.

use std::time::Duration;

use log::{error, info, warn};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::config::ResolvedConfig;
use crate::core::entry::{EntryError, EntryStore, date_label, save_status, today};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::{HelpLine, TextArea};
use crate::tui::event::TuiEvent;
use crate::tui::program::{Command, ExitAction, Message, Model};
use crate::tui::style::Palette;

pub const HELP: &[(&str, &str)] = &[("ctrl+s", "save"), ("ctrl+c", "quit")];
const CHECK_MARK: &str = "✓";
const CROSS_MARK: &str = "✗";

pub struct WriteScreen {
    store: EntryStore,
    text_area: TextArea,
    date_label: String,
    status: String,
    status_generation: u64,
    last_error: Option<String>,
    error_generation: u64,
    status_timeout: Duration,
    /// Set once Ctrl+C has started the exit hook.
    exit_action: Option<ExitAction>,
    palette: Palette,
}

impl WriteScreen {
    /// Load (or create) today's entry. Failure here is fatal to the invocation.
    pub fn open(
        store: EntryStore,
        config: &ResolvedConfig,
        palette: Palette,
    ) -> Result<Self, EntryError> {
        let body = store.read_today_or_create()?;
        info!(
            "Write screen opened on {} ({} bytes)",
            store.today_path().display(),
            body.len()
        );

        let mut text_area = TextArea::new(config.editor_width, config.editor_height, &palette)
            .with_placeholder(config.placeholder.clone());
        text_area.set_value(body);

        Ok(Self {
            store,
            text_area,
            date_label: date_label(today()),
            status: String::new(),
            status_generation: 0,
            last_error: None,
            error_generation: 0,
            status_timeout: Duration::from_millis(config.status_timeout_ms),
            exit_action: None,
            palette,
        })
    }

    pub fn value(&self) -> &str {
        self.text_area.value()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn focused(&self) -> bool {
        self.text_area.focused()
    }

    pub fn date_label(&self) -> &str {
        &self.date_label
    }

    fn save(&self) -> Command {
        let store = self.store.clone();
        let body = self.text_area.value().to_string();
        Command::perform(move || Message::Saved(store.write_today(&body)))
    }

    /// Ctrl+C: a blank buffer removes today's file, anything else is written.
    fn exit_hook(&mut self) -> Command {
        if self.exit_action.is_some() {
            return Command::None;
        }
        let store = self.store.clone();
        if self.text_area.is_blank() {
            self.exit_action = Some(ExitAction::Deleted);
            Command::perform(move || {
                let result = match store.delete_today() {
                    Err(e) if e.is_not_found() => Ok(()),
                    other => other,
                };
                Message::ExitHookDone(result.map(|()| ExitAction::Deleted))
            })
        } else {
            self.exit_action = Some(ExitAction::Saved);
            let body = self.text_area.value().to_string();
            Command::perform(move || {
                Message::ExitHookDone(store.write_today(&body).map(|()| ExitAction::Saved))
            })
        }
    }

    fn set_status<T>(&mut self, result: &Result<T, EntryError>) -> Command {
        self.status = save_status(result).to_string();
        self.status_generation += 1;
        let clear_status = Command::tick(
            self.status_timeout,
            Message::ClearStatus(self.status_generation),
        );

        match result {
            Ok(_) => {
                self.last_error = None;
                clear_status
            }
            Err(e) => {
                warn!("Save failed: {}", e);
                self.last_error = Some(e.to_string());
                self.error_generation += 1;
                Command::batch([
                    clear_status,
                    Command::tick(
                        self.status_timeout,
                        Message::ClearError(self.error_generation),
                    ),
                ])
            }
        }
    }

    fn handle_input(&mut self, event: TuiEvent) -> Command {
        match event {
            TuiEvent::Interrupt => self.exit_hook(),
            TuiEvent::Save => self.save(),
            TuiEvent::Escape => {
                if self.text_area.focused() {
                    self.text_area.blur();
                }
                Command::None
            }
            TuiEvent::Enter if !self.text_area.focused() => self.text_area.focus(),
            other => {
                let focus = if self.text_area.focused() {
                    Command::None
                } else {
                    self.text_area.focus()
                };
                self.text_area.handle_event(&other);
                focus
            }
        }
    }
}

impl Model for WriteScreen {
    fn init(&mut self) -> Command {
        self.text_area.focus()
    }

    fn update(&mut self, message: Message) -> Command {
        match message {
            Message::Input(event) => self.handle_input(event),
            Message::CursorBlink(generation) => self.text_area.on_blink(generation),
            Message::Saved(result) => self.set_status(&result),
            Message::ClearStatus(generation) => {
                if generation == self.status_generation {
                    self.status.clear();
                }
                Command::None
            }
            Message::ClearError(generation) => {
                if generation == self.error_generation {
                    self.last_error = None;
                }
                Command::None
            }
            Message::ExitHookDone(Ok(action)) => {
                info!("Write screen closed: {:?}", action);
                Command::Quit
            }
            Message::ExitHookDone(Err(e)) => {
                error!("Exit hook failed: {}", e);
                // The status is recorded for the last frame; the process still exits 1
                let _ = self.set_status(&Err::<(), _>(e));
                let reason = self.last_error.clone().unwrap_or_default();
                Command::Fatal(reason)
            }
            Message::Resize { .. } | Message::EntryLoaded { .. } => Command::None,
        }
    }

    fn view(&mut self, frame: &mut Frame) {
        let area = frame.area().inner(Margin::new(1, 1));
        let [date_area, _, text_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(self.text_area.height()),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Line::styled(
                self.date_label.as_str(),
                self.palette.primary_style(),
            )),
            date_area,
        );

        self.text_area.render(frame, text_area);

        if !self.status.is_empty() {
            let line = if self.last_error.is_some() {
                Line::from(vec![
                    Span::styled(format!("{CROSS_MARK} "), self.palette.error_style()),
                    Span::styled(self.status.as_str(), self.palette.error_style()),
                ])
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{CHECK_MARK} "),
                        Style::default().fg(self.palette.check_mark),
                    ),
                    Span::styled(
                        self.status.as_str(),
                        Style::default().fg(self.palette.success),
                    ),
                ])
            };
            frame.render_widget(Paragraph::new(line), status_area);
        }

        HelpLine::new(HELP, self.palette.dim_style()).render(frame, help_area);
    }
}
