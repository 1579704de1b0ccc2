//! Default screen: a framed banner. `q` or Ctrl+C quits; nothing else does anything.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::event::TuiEvent;
use crate::tui::program::{Command, Message, Model};
use crate::tui::style::Palette;

const BANNER: [&str; 6] = [
    "Welcome to",
    "▀▀█ █▀█ █ █ █▀▄ █▀█ █▀█ █   ▀█▀ █▀▀ █▄█ █ █ █▀▀",
    "  █ █ █ █ █ █▀▄ █ █ █▀█ █    █  ▀▀█ █ █ █ █ ▀▀█",
    "▀▀  ▀▀▀ ▀▀▀ ▀ ▀ ▀ ▀ ▀ ▀ ▀▀▀ ▀▀▀ ▀▀▀ ▀ ▀ ▀▀▀ ▀▀▀",
    "Capture thoughts effortlessly",
    "in the command line.",
];

pub struct WelcomeScreen {
    palette: Palette,
}

impl WelcomeScreen {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl Model for WelcomeScreen {
    fn update(&mut self, message: Message) -> Command {
        match message {
            Message::Input(TuiEvent::Interrupt | TuiEvent::InputChar('q')) => Command::Quit,
            _ => Command::None,
        }
    }

    fn view(&mut self, frame: &mut Frame) {
        let banner_width = BANNER.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        // Border (2) + one column of breathing room either side
        let width = banner_width + 4;
        let height = BANNER.len() as u16 + 2;

        let [row] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(frame.area());
        let [area] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(row);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.palette.primary_style());
        let banner = Paragraph::new(BANNER.join("\n"))
            .style(self.palette.primary_style())
            .alignment(Alignment::Center)
            .block(block);

        frame.render_widget(banner, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{buffer_text, draw};

    #[test]
    fn only_q_and_interrupt_quit() {
        let mut screen = WelcomeScreen::new(Palette::default());
        assert!(screen.init().is_none());
        assert!(matches!(
            screen.update(Message::Input(TuiEvent::InputChar('q'))),
            Command::Quit
        ));
        assert!(matches!(
            screen.update(Message::Input(TuiEvent::Interrupt)),
            Command::Quit
        ));
        for event in [TuiEvent::Enter, TuiEvent::Escape, TuiEvent::InputChar('x')] {
            assert!(screen.update(Message::Input(event)).is_none());
        }
        assert!(screen.update(Message::Resize { width: 10, height: 10 }).is_none());
    }

    #[test]
    fn banner_is_framed() {
        let mut screen = WelcomeScreen::new(Palette::default());
        let text = buffer_text(&draw(80, 20, |f| screen.view(f)));
        assert!(text.contains("Welcome to"));
        assert!(text.contains("in the command line."));
        assert!(text.contains('╭') && text.contains('╯'));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut screen = WelcomeScreen::new(Palette::default());
        draw(5, 2, |f| screen.view(f));
    }
}
