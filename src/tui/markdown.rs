//! Markdown → ratatui `Text` renderer.
//!
//! Thin wrapper around `pulldown_cmark` that converts markdown events into
//! styled `Line`/`Span` values. Headings, bold, italic, inline code, fenced
//! code blocks (with syntect highlighting), lists, blockquotes, and links.
//! Every color comes from a [`MarkdownTheme`], so a `theme.json` can restyle
//! the whole entry.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::tui::style::Background;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const DARK_CODE_THEME: &str = "base16-ocean.dark";
const LIGHT_CODE_THEME: &str = "base16-ocean.light";

/// Styles for every markdown element the writer emits.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownTheme {
    pub document: Style,
    /// H1 through H6.
    pub headings: [Style; 6],
    pub emph: Style,
    pub strong: Style,
    pub strikethrough: Style,
    pub code: Style,
    /// Unhighlighted code block text.
    pub code_block: Style,
    /// `╭──` / `│` / `╰──` frame around code blocks.
    pub code_border: Style,
    /// syntect theme name used to highlight fenced code with a language tag.
    pub code_theme: String,
    pub link: Style,
    pub block_quote: Style,
    pub quote_bar: Style,
    /// List markers (`- `, `1. `).
    pub item: Style,
    pub rule: Style,
}

impl MarkdownTheme {
    pub fn for_background(background: Background) -> Self {
        match background {
            Background::Dark => Self::dark(),
            Background::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        let base = Color::Indexed(252);
        Self {
            document: Style::default().fg(base),
            headings: [
                Style::default()
                    .fg(Color::Indexed(228))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                Style::default().fg(Color::Indexed(39)).add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Indexed(39))
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
                Style::default().fg(Color::Indexed(39)).add_modifier(Modifier::ITALIC),
                Style::default().fg(Color::Indexed(39)),
                Style::default().fg(Color::Indexed(35)),
            ],
            emph: Style::default().add_modifier(Modifier::ITALIC),
            strong: Style::default().add_modifier(Modifier::BOLD),
            strikethrough: Style::default().add_modifier(Modifier::CROSSED_OUT),
            code: Style::default().fg(Color::Indexed(203)).bg(Color::Indexed(236)),
            code_block: Style::default().fg(Color::White),
            code_border: Style::default().fg(Color::DarkGray),
            code_theme: DARK_CODE_THEME.to_string(),
            link: Style::default()
                .fg(Color::Indexed(30))
                .add_modifier(Modifier::UNDERLINED),
            block_quote: Style::default()
                .fg(base)
                .add_modifier(Modifier::DIM | Modifier::ITALIC),
            quote_bar: Style::default().fg(Color::DarkGray),
            item: Style::default().fg(Color::DarkGray),
            rule: Style::default().fg(Color::Indexed(240)),
        }
    }

    pub fn light() -> Self {
        let base = Color::Indexed(234);
        Self {
            document: Style::default().fg(base),
            headings: [
                Style::default()
                    .fg(Color::Indexed(27))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                Style::default().fg(Color::Indexed(27)).add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Indexed(27))
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
                Style::default().fg(Color::Indexed(27)).add_modifier(Modifier::ITALIC),
                Style::default().fg(Color::Indexed(27)),
                Style::default().fg(Color::Indexed(28)),
            ],
            emph: Style::default().add_modifier(Modifier::ITALIC),
            strong: Style::default().add_modifier(Modifier::BOLD),
            strikethrough: Style::default().add_modifier(Modifier::CROSSED_OUT),
            code: Style::default().fg(Color::Indexed(203)).bg(Color::Indexed(254)),
            code_block: Style::default().fg(Color::Indexed(236)),
            code_border: Style::default().fg(Color::Indexed(249)),
            code_theme: LIGHT_CODE_THEME.to_string(),
            link: Style::default()
                .fg(Color::Indexed(36))
                .add_modifier(Modifier::UNDERLINED),
            block_quote: Style::default()
                .fg(base)
                .add_modifier(Modifier::DIM | Modifier::ITALIC),
            quote_bar: Style::default().fg(Color::Indexed(249)),
            item: Style::default().fg(Color::Indexed(244)),
            rule: Style::default().fg(Color::Indexed(249)),
        }
    }

    fn heading(&self, level: HeadingLevel) -> Style {
        self.headings[heading_depth(level) as usize - 1]
    }

    fn syntect_theme(&self) -> Option<&'static Theme> {
        THEME_SET.themes.get(&self.code_theme)
    }

    /// Whether `name` is a syntect theme bundled with the binary.
    pub fn has_code_theme(name: &str) -> bool {
        THEME_SET.themes.contains_key(name)
    }
}

impl Default for MarkdownTheme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Parse markdown content into styled `Text` using the given theme.
///
/// Returns owned text (`'static`) so callers aren't constrained by input lifetime.
pub fn render(content: &str, theme: &MarkdownTheme) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut w = Writer::new(theme);
    for event in Parser::new_ext(content, opts) {
        w.handle(event);
    }
    w.text
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct Writer<'t> {
    text: Text<'static>,
    theme: &'t MarkdownTheme,
    /// Inline style stack (bold, italic, heading text, etc.). Styles compose
    /// via `patch` so nested bold+italic works.
    styles: Vec<Style>,
    /// Per-line prefix spans (blockquote `│`).
    line_prefixes: Vec<Span<'static>>,
    /// List nesting: None = unordered, Some(n) = ordered at index n.
    list_indices: Vec<Option<u64>>,
    /// Active syntax highlighter for fenced code blocks.
    highlighter: Option<HighlightLines<'static>>,
    /// True when inside a code block without syntax highlighting.
    in_plain_code: bool,
    /// Stored link URL, appended after the link text closes.
    link_url: Option<String>,
    /// Whether the next block element should be preceded by a blank line.
    needs_newline: bool,
}

impl<'t> Writer<'t> {
    fn new(theme: &'t MarkdownTheme) -> Self {
        Self {
            text: Text::default(),
            theme,
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            highlighter: None,
            in_plain_code: false,
            link_url: None,
            needs_newline: false,
        }
    }

    // ── Style helpers ───────────────────────────────────────────────────

    /// Current effective style: top of stack, or the document style.
    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(self.theme.document)
    }

    /// Push a style that composes with the current one (inherits parent modifiers).
    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    // ── Line/span helpers ───────────────────────────────────────────────

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for pfx in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, pfx);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        if let Some(line) = self.text.lines.last_mut() {
            line.push_span(span);
        } else {
            self.push_line(Line::from(vec![span]));
        }
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line(Line::default());
            self.needs_newline = false;
        }
    }

    // ── Event dispatch ──────────────────────────────────────────────────

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.inline_code(c),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.push_line(Line::default()),
            Event::Rule => {
                self.blank_line_if_needed();
                self.push_line(Line::from(Span::styled("─".repeat(40), self.theme.rule)));
                self.needs_newline = true;
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_span(Span::styled(marker, self.theme.item));
            }
            _ => {} // HTML, footnotes, math: skipped
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            // ── Block elements ──────────────────────────────────────────
            Tag::Paragraph => {
                self.blank_line_if_needed();
                self.push_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.blank_line_if_needed();
                let hs = self.style().patch(self.theme.heading(level));
                let depth = heading_depth(level) as usize;
                self.push_line(Line::from(Span::styled(format!("{} ", "#".repeat(depth)), hs)));
                // Heading text inherits the heading style, not just the `#` prefix
                self.push_style(self.theme.heading(level));
            }
            Tag::BlockQuote(_) => {
                self.blank_line_if_needed();
                self.line_prefixes
                    .push(Span::styled("│ ", self.theme.quote_bar));
                self.push_style(self.theme.block_quote);
            }
            Tag::CodeBlock(kind) => {
                self.blank_line_if_needed();
                let lang = match &kind {
                    CodeBlockKind::Fenced(l) => l.as_ref(),
                    CodeBlockKind::Indented => "",
                };

                // Top border: ╭── lang  or just ╭──
                let bs = self.theme.code_border;
                let top = if lang.is_empty() {
                    Line::from(Span::styled("╭──", bs))
                } else {
                    Line::from(vec![
                        Span::styled("╭── ", bs),
                        Span::styled(lang.to_owned(), bs.add_modifier(Modifier::BOLD)),
                        Span::styled(" ──", bs),
                    ])
                };
                self.push_line(top);

                // Left border prefix for code content
                self.line_prefixes.push(Span::styled("│ ", bs));

                if !lang.is_empty()
                    && let Some(syn) = SYNTAX_SET.find_syntax_by_token(lang)
                    && let Some(theme) = self.theme.syntect_theme()
                {
                    self.highlighter = Some(HighlightLines::new(syn, theme));
                }
                if self.highlighter.is_none() {
                    self.in_plain_code = true;
                }
            }
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.blank_line_if_needed();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.push_line(Line::default());
                let depth = self.list_indices.len().saturating_sub(1);
                let indent = "  ".repeat(depth);
                if let Some(idx) = self.list_indices.last_mut() {
                    let marker = match idx {
                        None => format!("{indent}- "),
                        Some(n) => {
                            let s = format!("{indent}{}. ", n);
                            *n += 1;
                            s
                        }
                    };
                    let item_style = self.theme.item;
                    self.push_span(Span::styled(marker, item_style));
                }
            }

            // ── Inline elements ─────────────────────────────────────────
            Tag::Emphasis => self.push_style(self.theme.emph),
            Tag::Strong => self.push_style(self.theme.strong),
            Tag::Strikethrough => self.push_style(self.theme.strikethrough),
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(self.theme.link);
            }
            _ => {} // Tables, images, definitions: skipped
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_newline = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::CodeBlock => {
                self.highlighter = None;
                self.in_plain_code = false;
                self.line_prefixes.pop(); // remove │ prefix before bottom border
                self.push_line(Line::from(Span::styled("╰──", self.theme.code_border)));
                self.needs_newline = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_newline = true;
            }
            TagEnd::Item => {}
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    self.push_span(Span::raw(" ("));
                    self.push_span(Span::styled(url, self.theme.link));
                    self.push_span(Span::raw(")"));
                }
            }
            _ => {}
        }
    }

    // ── Content handlers ────────────────────────────────────────────────

    fn text(&mut self, cow: CowStr<'_>) {
        // Expand tabs → 4 spaces (ratatui renders \t as zero-width)
        let raw = cow.to_string();
        let text = if raw.contains('\t') {
            raw.replace('\t', "    ")
        } else {
            raw
        };

        // Syntax-highlighted code block. The highlighter is taken out while
        // lines are pushed, since both borrow self mutably.
        if let Some(mut hl) = self.highlighter.take() {
            for line in LinesWithEndings::from(text.as_str()) {
                if let Ok(ranges) = hl.highlight_line(line, &SYNTAX_SET) {
                    let spans: Vec<Span<'static>> = ranges
                        .into_iter()
                        .filter_map(|(hl_style, frag)| {
                            let content = frag.trim_end_matches('\n').to_string();
                            if content.is_empty() {
                                return None;
                            }
                            let fg = Color::Rgb(
                                hl_style.foreground.r,
                                hl_style.foreground.g,
                                hl_style.foreground.b,
                            );
                            Some(Span::styled(content, Style::default().fg(fg)))
                        })
                        .collect();
                    self.push_line(Line::from(spans));
                }
            }
            self.highlighter = Some(hl);
            return;
        }

        // Plain code block (no highlighting available)
        if self.in_plain_code {
            for line in text.lines() {
                self.push_line(Line::from(Span::styled(line.to_owned(), self.theme.code_block)));
            }
            return;
        }

        // Normal text inherits the current style
        let style = self.style();
        self.push_span(Span::styled(text, style));
    }

    fn inline_code(&mut self, cow: CowStr<'_>) {
        let style = self.style().patch(self.theme.code);
        self.push_span(Span::styled(cow.to_string(), style));
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
