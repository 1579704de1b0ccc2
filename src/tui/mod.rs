//! # TUI Adapter
//!
//! The ratatui/crossterm layer: screens, widgets, styling, and the terminal
//! loop that drives a `Program`.
//!
//! `core` knows nothing about this module. Everything terminal-specific
//! (raw mode, the alternate screen, key translation, colors) stays here.
//!
//! ## Redraw Strategy
//!
//! The loop draws, then sleeps in `poll` until either input arrives or the
//! earliest pending timer is due, capped at `IDLE_POLL`. Input that queued up
//! while a frame was drawn is drained before the next draw, so a fast paste
//! or key repeat costs one frame rather than one per event.
//!
//! The text area blinks its own cursor on a timer, so the terminal cursor is
//! set to a steady block; a blinking terminal cursor would have its phase reset
//! by every `draw()`.

pub mod ansi;
pub mod component;
pub mod components;
pub mod event;
pub mod markdown;
pub mod program;
pub mod render;
pub mod screens;
pub mod style;

use std::fmt;
use std::io::{self, Write, stdout};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use log::{debug, info};
use ratatui::DefaultTerminal;
use ratatui::text::{Line, Text};

use crate::cli::Verb;
use crate::core::config::ResolvedConfig;
use crate::core::entry::{EntryError, EntryStore, entry_file_name, today};
use crate::tui::event::poll_event_timeout;
use crate::tui::program::{Message, Model, Outcome, Program, ProgramError};
use crate::tui::render::{Renderer, load_renderer};
use crate::tui::screens::{Screen, ViewScreen, WelcomeScreen, WriteScreen};
use crate::tui::style::{Background, Palette};

/// Longest sleep between redraws when no timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Printed (dim) by `view today` before falling through to the Write screen.
pub const NO_ENTRY_TODAY: &str = " No entry for today detected...";

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape,
            Show
        );
    }
}

// ============================================================================
// Terminal Loop
// ============================================================================

/// Take over the terminal and run `model` until it quits or aborts.
///
/// The terminal is restored on every exit path; panics are covered by the
/// hook `ratatui::try_init` installs.
pub fn run<M: Model>(model: M) -> Result<(), ProgramError> {
    let mut terminal = ratatui::try_init()?;
    let result = TerminalModeGuard::new()
        .map_err(ProgramError::from)
        .and_then(|_guard| drive(&mut terminal, model));
    ratatui::restore();
    result
}

fn drive<M: Model>(terminal: &mut DefaultTerminal, model: M) -> Result<(), ProgramError> {
    let mut program = Program::new(model);
    program.start(Instant::now());

    let size = terminal.size()?;
    program.send(
        Message::Resize {
            width: size.width,
            height: size.height,
        },
        Instant::now(),
    );

    while program.is_running() {
        terminal.draw(|frame| program.view(frame))?;

        let timeout = program
            .next_deadline()
            .map(|due| due.saturating_duration_since(Instant::now()))
            .map_or(IDLE_POLL, |until_due| until_due.min(IDLE_POLL));

        let mut next = poll_event_timeout(timeout)?;
        while let Some(event) = next.take() {
            program.send(event.into(), Instant::now());
            if !program.is_running() {
                break;
            }
            next = poll_event_timeout(Duration::ZERO)?;
        }

        program.advance(Instant::now());
    }

    match program.outcome() {
        Outcome::Aborted(reason) => Err(ProgramError::Aborted(reason.clone())),
        Outcome::Quit | Outcome::Running => Ok(()),
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Why a verb could not run to completion.
#[derive(Debug)]
pub enum LaunchError {
    /// The terminal program failed or a screen aborted.
    Program(ProgramError),
    /// A screen could not be built from the entry store.
    Entry(EntryError),
    /// Writing `view today` output failed.
    Output(io::Error),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::Program(e) => write!(f, "{e}"),
            LaunchError::Entry(e) => write!(f, "{e}"),
            LaunchError::Output(e) => write!(f, "writing output: {e}"),
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaunchError::Program(e) => Some(e),
            LaunchError::Entry(e) => Some(e),
            LaunchError::Output(e) => Some(e),
        }
    }
}

impl From<ProgramError> for LaunchError {
    fn from(e: ProgramError) -> Self {
        LaunchError::Program(e)
    }
}

impl From<EntryError> for LaunchError {
    fn from(e: EntryError) -> Self {
        LaunchError::Entry(e)
    }
}

/// Build the screen a verb asks for. `ViewToday` is not a screen; see `launch`.
pub fn build_screen(
    verb: Verb,
    config: &ResolvedConfig,
    background: Background,
) -> Result<Screen, EntryError> {
    let palette = Palette::for_background(background);
    let store = EntryStore::new(&config.entries_dir);
    Ok(match verb {
        Verb::Welcome => Screen::Welcome(WelcomeScreen::new(palette)),
        Verb::Write | Verb::ViewToday => {
            Screen::Write(WriteScreen::open(store, config, palette)?)
        }
        Verb::View => {
            let renderer = load_renderer(&config.theme, &config.entries_dir, background);
            Screen::View(ViewScreen::open(store, renderer, palette)?)
        }
    })
}

/// Run one invocation. The background must already be settled.
pub fn launch(
    verb: Verb,
    config: &ResolvedConfig,
    background: Background,
) -> Result<(), LaunchError> {
    if verb == Verb::ViewToday {
        let store = EntryStore::new(&config.entries_dir);
        let renderer = load_renderer(&config.theme, &config.entries_dir, background);
        let palette = Palette::for_background(background);
        let printed = print_today(&store, renderer.as_ref(), &palette, &mut stdout())?;
        if printed == TodayOutcome::Printed {
            return Ok(());
        }
        info!("No entry for today, falling through to the Write screen");
    }

    let screen = build_screen(verb, config, background)?;
    info!("Starting {} screen", screen.name());
    run(screen)?;
    debug!("Program exited normally");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodayOutcome {
    /// Today's entry was rendered to the output.
    Printed,
    /// There is no entry for today; the notice was printed instead.
    Missing,
}

/// `view today` without a TUI: today's entry, rendered and padded by one
/// row and column, or a dim notice when there is none.
pub fn print_today(
    store: &EntryStore,
    renderer: &dyn Renderer,
    palette: &Palette,
    out: &mut impl Write,
) -> Result<TodayOutcome, LaunchError> {
    if !store.today_exists() {
        let notice = Text::from(Line::styled(NO_ENTRY_TODAY, palette.dim_style()));
        ansi::write_text(out, &notice, 0).map_err(LaunchError::Output)?;
        return Ok(TodayOutcome::Missing);
    }

    let body = store.read(&entry_file_name(today()))?;
    let rendered = renderer.render(&body);
    debug!("Printing today's entry ({} lines)", rendered.lines.len());

    writeln!(out).map_err(LaunchError::Output)?;
    ansi::write_text(out, &rendered, 1).map_err(LaunchError::Output)?;
    writeln!(out).map_err(LaunchError::Output)?;
    Ok(TodayOutcome::Printed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{temp_store, test_config};
    use crate::tui::render::PlainRenderer;

    #[test]
    fn print_today_without_entry_prints_notice() {
        let (_dir, store) = temp_store();
        let mut out = Vec::new();
        let outcome = print_today(&store, &PlainRenderer, &Palette::default(), &mut out).unwrap();
        assert_eq!(outcome, TodayOutcome::Missing);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(NO_ENTRY_TODAY));
        assert!(!store.today_exists(), "printing must not create the entry");
    }

    #[test]
    fn print_today_renders_padded_body() {
        let (_dir, store) = temp_store();
        store.write_today("dear diary\nsecond").unwrap();
        let mut out = Vec::new();
        let outcome = print_today(&store, &PlainRenderer, &Palette::default(), &mut out).unwrap();
        assert_eq!(outcome, TodayOutcome::Printed);
        assert_eq!(String::from_utf8(out).unwrap(), "\n dear diary\n second\n\n");
    }

    #[test]
    fn build_screen_picks_the_verb() {
        let (_dir, store) = temp_store();
        let config = test_config(&store);
        let background = Background::Dark;

        let screen = build_screen(Verb::Welcome, &config, background).unwrap();
        assert_eq!(screen.name(), "welcome");
        assert!(!store.today_exists());

        let screen = build_screen(Verb::View, &config, background).unwrap();
        assert_eq!(screen.name(), "view");

        let screen = build_screen(Verb::ViewToday, &config, background).unwrap();
        assert_eq!(screen.name(), "write");
        assert!(store.today_exists());
    }

    #[test]
    fn build_screen_surfaces_store_errors() {
        let (dir, store) = temp_store();
        let mut config = test_config(&store);
        config.entries_dir = dir.path().join("missing");
        assert!(build_screen(Verb::Write, &config, Background::Dark).is_err());
        assert!(build_screen(Verb::View, &config, Background::Dark).is_err());
    }
}
