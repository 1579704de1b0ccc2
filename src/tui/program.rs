//! # Program Host
//!
//! The Model/Update/View contract shared by every screen, and the host that
//! drives it.
//!
//! ```text
//! Message  →  Model::update()  →  Command  →  Program (timers, tasks, quit)
//!                                               │
//!                 Message (timer fired, task done) ◄┘
//! ```
//!
//! `update` never touches the filesystem or the clock. Anything with a side
//! effect is returned as a `Command`: file work as `Perform` (a closure the host
//! runs, whose result comes back as a `Message`) and delays as `Tick`. This
//! keeps `Program` deterministic under a synthetic clock, which is how the tests
//! drive it. The terminal loop in `tui::run` is the only place real time and
//! real input enter.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, warn};
use ratatui::Frame;

use crate::core::entry::EntryError;
use crate::tui::event::TuiEvent;

// ============================================================================
// Messages
// ============================================================================

/// What the Write screen did on its way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitAction {
    /// Non-blank buffer written to today's entry.
    Saved,
    /// Blank buffer, today's entry removed.
    Deleted,
}

/// Everything `update` can receive.
#[derive(Debug)]
pub enum Message {
    /// A key press or paste.
    Input(TuiEvent),
    /// The terminal was resized.
    Resize { width: u16, height: u16 },
    /// Text area cursor blink; stale generations are ignored.
    CursorBlink(u64),
    /// Blank the Write screen status line, if it is still the same message.
    ClearStatus(u64),
    /// Blank an inline error, if it is still the same error.
    ClearError(u64),
    /// A save requested with Ctrl+S finished.
    Saved(Result<(), EntryError>),
    /// The Write screen's save-or-delete hook finished.
    ExitHookDone(Result<ExitAction, EntryError>),
    /// An entry picked in the View screen was read.
    EntryLoaded {
        name: String,
        result: Result<String, EntryError>,
    },
}

impl From<TuiEvent> for Message {
    fn from(event: TuiEvent) -> Self {
        match event {
            TuiEvent::Resize(width, height) => Message::Resize { width, height },
            other => Message::Input(other),
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Synchronous side effect run by the host. Its result is fed back to `update`.
pub type Task = Box<dyn FnOnce() -> Message>;

/// A request from `update` to the host.
#[derive(Default)]
pub enum Command {
    #[default]
    None,
    /// Stop the loop and exit normally.
    Quit,
    /// Stop the loop and exit with an error.
    Fatal(String),
    Batch(Vec<Command>),
    /// Deliver the message once, no earlier than the delay.
    Tick(Duration, Message),
    Perform(Task),
}

impl Command {
    pub fn tick(delay: Duration, message: Message) -> Self {
        Command::Tick(delay, message)
    }

    pub fn perform(task: impl FnOnce() -> Message + 'static) -> Self {
        Command::Perform(Box::new(task))
    }

    /// Combine commands, dropping `None`s. A single survivor is returned as-is.
    pub fn batch(commands: impl IntoIterator<Item = Command>) -> Self {
        let mut commands: Vec<Command> = commands
            .into_iter()
            .filter(|c| !matches!(c, Command::None))
            .collect();
        match commands.len() {
            0 => Command::None,
            1 => commands.remove(0),
            _ => Command::Batch(commands),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::None => write!(f, "None"),
            Command::Quit => write!(f, "Quit"),
            Command::Fatal(reason) => f.debug_tuple("Fatal").field(reason).finish(),
            Command::Batch(commands) => f.debug_tuple("Batch").field(commands).finish(),
            Command::Tick(delay, message) => {
                f.debug_tuple("Tick").field(delay).field(message).finish()
            }
            Command::Perform(_) => write!(f, "Perform(..)"),
        }
    }
}

// ============================================================================
// Model Contract
// ============================================================================

/// A top-level screen: state plus the three Model/Update/View operations.
pub trait Model {
    /// Commands to run once before the first event.
    fn init(&mut self) -> Command {
        Command::None
    }

    /// Apply one message to completion.
    fn update(&mut self, message: Message) -> Command;

    /// Draw the current state. Takes `&mut self` so widgets can cache layout.
    fn view(&mut self, frame: &mut Frame);
}

// ============================================================================
// Host
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Running,
    Quit,
    Aborted(String),
}

#[derive(Debug)]
pub enum ProgramError {
    /// Terminal I/O failed.
    Io(std::io::Error),
    /// A screen requested a fatal exit.
    Aborted(String),
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::Io(e) => write!(f, "terminal I/O error: {e}"),
            ProgramError::Aborted(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for ProgramError {}

impl From<std::io::Error> for ProgramError {
    fn from(e: std::io::Error) -> Self {
        ProgramError::Io(e)
    }
}

struct Timer {
    due: Instant,
    /// Insertion order, so equal deadlines fire in the order they were armed.
    seq: u64,
    message: Message,
}

/// Runs a `Model`: queues messages, executes commands, keeps timers.
pub struct Program<M: Model> {
    model: M,
    queue: VecDeque<Message>,
    timers: Vec<Timer>,
    next_seq: u64,
    outcome: Outcome,
}

impl<M: Model> Program<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            queue: VecDeque::new(),
            timers: Vec::new(),
            next_seq: 0,
            outcome: Outcome::Running,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_running(&self) -> bool {
        self.outcome == Outcome::Running
    }

    /// Run the model's `init` commands.
    pub fn start(&mut self, now: Instant) {
        let command = self.model.init();
        self.execute(command, now);
        self.drain(now);
    }

    /// Deliver one message, then everything it causes synchronously.
    pub fn send(&mut self, message: Message, now: Instant) {
        self.queue.push_back(message);
        self.drain(now);
    }

    /// Fire every timer due at `now`, earliest first.
    pub fn advance(&mut self, now: Instant) {
        while self.is_running() {
            let Some(idx) = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due <= now)
                .min_by_key(|(_, t)| (t.due, t.seq))
                .map(|(i, _)| i)
            else {
                break;
            };
            let timer = self.timers.swap_remove(idx);
            self.send(timer.message, now);
        }
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|t| t.due).min()
    }

    /// Whether a pending timer carries a message matching `pred`.
    pub fn has_timer(&self, pred: impl Fn(&Message) -> bool) -> bool {
        self.timers.iter().any(|t| pred(&t.message))
    }

    pub fn view(&mut self, frame: &mut Frame) {
        self.model.view(frame);
    }

    fn drain(&mut self, now: Instant) {
        while self.is_running() {
            let Some(message) = self.queue.pop_front() else {
                break;
            };
            let command = self.model.update(message);
            self.execute(command, now);
        }
        if !self.is_running() {
            // Pending timers and queued messages die with the program
            self.queue.clear();
            self.timers.clear();
        }
    }

    fn execute(&mut self, command: Command, now: Instant) {
        if !self.is_running() {
            return;
        }
        match command {
            Command::None => {}
            Command::Quit => {
                debug!("Program quit requested");
                self.outcome = Outcome::Quit;
            }
            Command::Fatal(reason) => {
                warn!("Program aborted: {}", reason);
                self.outcome = Outcome::Aborted(reason);
            }
            Command::Batch(commands) => {
                for command in commands {
                    self.execute(command, now);
                }
            }
            Command::Tick(delay, message) => {
                self.timers.push(Timer {
                    due: now + delay,
                    seq: self.next_seq,
                    message,
                });
                self.next_seq += 1;
            }
            Command::Perform(task) => {
                let message = task();
                self.queue.push_back(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every message it sees; reacts to a few inputs.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Model for Recorder {
        fn init(&mut self) -> Command {
            Command::tick(Duration::from_millis(100), Message::ClearStatus(0))
        }

        fn update(&mut self, message: Message) -> Command {
            self.seen.push(format!("{message:?}"));
            match message {
                Message::Input(TuiEvent::Interrupt) => {
                    let log = Rc::clone(&self.log);
                    Command::batch([
                        Command::perform(move || {
                            log.borrow_mut().push("saved");
                            Message::Saved(Ok(()))
                        }),
                        Command::Quit,
                    ])
                }
                Message::Input(TuiEvent::Save) => Command::batch([
                    Command::tick(Duration::from_secs(2), Message::ClearStatus(2)),
                    Command::tick(Duration::from_secs(1), Message::ClearStatus(1)),
                ]),
                Message::Input(TuiEvent::Escape) => Command::Fatal("boom".to_string()),
                _ => Command::None,
            }
        }

        fn view(&mut self, _frame: &mut Frame) {}
    }

    #[test]
    fn init_arms_timer() {
        let now = Instant::now();
        let mut program = Program::new(Recorder::default());
        program.start(now);
        assert_eq!(program.next_deadline(), Some(now + Duration::from_millis(100)));
        program.advance(now + Duration::from_millis(99));
        assert!(program.model().seen.is_empty());
        program.advance(now + Duration::from_millis(100));
        assert_eq!(program.model().seen, vec!["ClearStatus(0)"]);
        assert_eq!(program.next_deadline(), None);
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let now = Instant::now();
        let mut program = Program::new(Recorder::default());
        program.send(Message::Input(TuiEvent::Save), now);
        program.advance(now + Duration::from_secs(5));
        let fired: Vec<_> = program.model().seen.iter().skip(1).cloned().collect();
        assert_eq!(fired, vec!["ClearStatus(1)", "ClearStatus(2)"]);
    }

    #[test]
    fn perform_completes_before_quit() {
        let now = Instant::now();
        let mut program = Program::new(Recorder::default());
        let log = Rc::clone(&program.model().log);
        program.start(now);
        program.send(Message::Input(TuiEvent::Interrupt), now);
        assert_eq!(*log.borrow(), vec!["saved"]);
        assert_eq!(program.outcome(), &Outcome::Quit);
        // Timers are dropped at exit
        assert_eq!(program.next_deadline(), None);
    }

    #[test]
    fn fatal_stops_the_program() {
        let now = Instant::now();
        let mut program = Program::new(Recorder::default());
        program.send(Message::Input(TuiEvent::Escape), now);
        assert_eq!(program.outcome(), &Outcome::Aborted("boom".to_string()));
        program.send(Message::Input(TuiEvent::Save), now);
        // Nothing is processed after the program stopped
        assert_eq!(program.model().seen.len(), 1);
    }

    #[test]
    fn batch_flattens_trivial_cases() {
        assert!(Command::batch([Command::None, Command::None]).is_none());
        assert!(matches!(
            Command::batch([Command::None, Command::Quit]),
            Command::Quit
        ));
        assert!(matches!(
            Command::batch([Command::Quit, Command::Quit]),
            Command::Batch(v) if v.len() == 2
        ));
    }

    #[test]
    fn resize_event_becomes_resize_message() {
        assert!(matches!(
            Message::from(TuiEvent::Resize(100, 40)),
            Message::Resize { width: 100, height: 40 }
        ));
        assert!(matches!(
            Message::from(TuiEvent::Tab),
            Message::Input(TuiEvent::Tab)
        ));
    }
}
