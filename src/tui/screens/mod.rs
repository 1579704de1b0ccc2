//! # Screens
//!
//! The three top-level models. The dispatcher builds exactly one per
//! invocation and hands it to the terminal loop as a `Screen`.

pub mod view;
pub mod welcome;
pub mod write;

use ratatui::Frame;

use crate::tui::program::{Command, Message, Model};

pub use view::ViewScreen;
pub use welcome::WelcomeScreen;
pub use write::WriteScreen;

pub enum Screen {
    Welcome(WelcomeScreen),
    Write(WriteScreen),
    View(ViewScreen),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Welcome(_) => "welcome",
            Screen::Write(_) => "write",
            Screen::View(_) => "view",
        }
    }

    fn model(&mut self) -> &mut dyn Model {
        match self {
            Screen::Welcome(screen) => screen,
            Screen::Write(screen) => screen,
            Screen::View(screen) => screen,
        }
    }
}

impl Model for Screen {
    fn init(&mut self) -> Command {
        self.model().init()
    }

    fn update(&mut self, message: Message) -> Command {
        self.model().update(message)
    }

    fn view(&mut self, frame: &mut Frame) {
        self.model().view(frame)
    }
}
