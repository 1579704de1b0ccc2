//! Styled `Text` → escape-coded bytes, for output that bypasses the TUI
//! (`journal view today` prints straight to stdout).

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{ContentStyle, Print, PrintStyledContent, StyledContent};
use ratatui::backend::IntoCrossterm;
use ratatui::style::Style;
use ratatui::text::Text;

/// Write `text` line by line, each line prefixed by `indent` spaces.
pub fn write_text(out: &mut impl Write, text: &Text<'_>, indent: usize) -> io::Result<()> {
    let pad = " ".repeat(indent);
    for line in &text.lines {
        queue!(out, Print(&pad))?;
        for span in &line.spans {
            let style = line.style.patch(span.style);
            if style == Style::default() {
                queue!(out, Print(span.content.as_ref()))?;
            } else {
                let content_style: ContentStyle = style.into_crossterm();
                let styled = StyledContent::new(content_style, span.content.as_ref());
                queue!(out, PrintStyledContent(styled))?;
            }
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()
}
