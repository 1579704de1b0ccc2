//! # HelpLine Component
//!
//! One dim line of key hints, e.g. `ctrl+s: save • ctrl+c: quit`.
//!
//! Stateless: the bindings and style are props set by the owning screen.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

const SEPARATOR: &str = " • ";

pub struct HelpLine {
    pub bindings: &'static [(&'static str, &'static str)],
    pub style: Style,
}

impl HelpLine {
    pub fn new(bindings: &'static [(&'static str, &'static str)], style: Style) -> Self {
        Self { bindings, style }
    }

    /// The hint text as it appears on screen.
    pub fn text(&self) -> String {
        self.bindings
            .iter()
            .map(|(key, action)| format!("{key}: {action}"))
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }
}

impl Component for HelpLine {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(
            Paragraph::new(Line::styled(self.text(), self.style)),
            area,
        );
    }
}
