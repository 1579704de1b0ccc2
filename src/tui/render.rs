//! # Renderer Adapter
//!
//! Screens only see [`Renderer`]: markup text in, styled `Text` out. Which
//! implementation sits behind it is decided once, from the `theme` setting:
//!
//! - `"dark"` / `"light"`: built-in markdown presets
//! - `"plain"`: no styling at all
//! - anything else: a JSON theme file, relative to the entries directory
//!
//! A missing theme file means "use the preset for this background". A theme
//! that fails to load (bad JSON, bad color, unknown preset) never fails the
//! screen: the adapter falls back to unstyled pass-through and logs a warning.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;
use serde::Deserialize;

use crate::tui::markdown::{self, MarkdownTheme};
use crate::tui::style::Background;

/// Turns entry markup into styled terminal text.
pub trait Renderer {
    fn name(&self) -> &str;

    fn render(&self, markup: &str) -> Text<'static>;
}

/// Markdown through the `pulldown_cmark` writer.
pub struct MarkdownRenderer {
    theme: MarkdownTheme,
}

impl MarkdownRenderer {
    pub fn new(theme: MarkdownTheme) -> Self {
        Self { theme }
    }
}

impl Renderer for MarkdownRenderer {
    fn name(&self) -> &str {
        "markdown"
    }

    fn render(&self, markup: &str) -> Text<'static> {
        markdown::render(markup, &self.theme)
    }
}

/// Unstyled pass-through. Only tabs are touched (ratatui draws them zero-width).
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn name(&self) -> &str {
        "plain"
    }

    fn render(&self, markup: &str) -> Text<'static> {
        Text::raw(markup.replace('\t', "    "))
    }
}

// ============================================================================
// Theme Sources
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeSource {
    Preset(String),
    Plain,
    File(PathBuf),
}

impl ThemeSource {
    /// Bare words are preset names; anything path-like is a file.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let path_like = value.contains('.') || value.contains('/') || value.contains('\\');
        match value {
            "plain" | "notty" => ThemeSource::Plain,
            _ if path_like => ThemeSource::File(PathBuf::from(value)),
            _ => ThemeSource::Preset(value.to_string()),
        }
    }
}

#[derive(Debug)]
pub enum ThemeError {
    Io(io::Error),
    Parse(serde_json::Error),
    InvalidColor(String),
    UnknownPreset(String),
    UnknownCodeTheme(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::Io(e) => write!(f, "theme I/O error: {e}"),
            ThemeError::Parse(e) => write!(f, "theme parse error: {e}"),
            ThemeError::InvalidColor(c) => write!(f, "invalid theme color {c:?}"),
            ThemeError::UnknownPreset(p) => write!(f, "unknown theme preset {p:?}"),
            ThemeError::UnknownCodeTheme(t) => write!(f, "unknown code block theme {t:?}"),
        }
    }
}

impl std::error::Error for ThemeError {}

/// Build the renderer for a `theme` setting. Never fails; see module docs.
pub fn load_renderer(theme: &str, base_dir: &Path, background: Background) -> Box<dyn Renderer> {
    let result = match ThemeSource::parse(theme) {
        ThemeSource::Plain => return Box::new(PlainRenderer),
        ThemeSource::Preset(name) => preset(&name, background),
        ThemeSource::File(path) => {
            let path = base_dir.join(path);
            match load_theme_file(&path, background) {
                Err(ThemeError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                    info!("No theme at {}, using {:?} preset", path.display(), background);
                    Ok(MarkdownTheme::for_background(background))
                }
                other => other,
            }
        }
    };

    match result {
        Ok(theme) => Box::new(MarkdownRenderer::new(theme)),
        Err(e) => {
            warn!("Theme {:?} unusable ({}), rendering entries unstyled", theme, e);
            Box::new(PlainRenderer)
        }
    }
}

fn preset(name: &str, background: Background) -> Result<MarkdownTheme, ThemeError> {
    match name {
        "dark" => Ok(MarkdownTheme::dark()),
        "light" => Ok(MarkdownTheme::light()),
        "auto" => Ok(MarkdownTheme::for_background(background)),
        other => Err(ThemeError::UnknownPreset(other.to_string())),
    }
}

/// Load a JSON theme file on top of the background's preset.
pub fn load_theme_file(path: &Path, background: Background) -> Result<MarkdownTheme, ThemeError> {
    let contents = fs::read_to_string(path).map_err(ThemeError::Io)?;
    let file: ThemeFile = serde_json::from_str(&contents).map_err(ThemeError::Parse)?;
    let theme = file.apply(MarkdownTheme::for_background(background))?;
    info!("Loaded theme from {}", path.display());
    Ok(theme)
}

// ============================================================================
// Theme File (all fields Option<T> for sparse JSON)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct StyleSpec {
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub crossed_out: Option<bool>,
    pub faint: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CodeBlockSpec {
    #[serde(flatten)]
    pub style: StyleSpec,
    /// syntect theme name.
    pub theme: Option<String>,
}

/// Unknown keys are ignored, so richer theme files load too.
#[derive(Debug, Default, Deserialize)]
pub struct ThemeFile {
    pub document: Option<StyleSpec>,
    pub heading: Option<StyleSpec>,
    pub h1: Option<StyleSpec>,
    pub h2: Option<StyleSpec>,
    pub h3: Option<StyleSpec>,
    pub h4: Option<StyleSpec>,
    pub h5: Option<StyleSpec>,
    pub h6: Option<StyleSpec>,
    pub emph: Option<StyleSpec>,
    pub strong: Option<StyleSpec>,
    pub strikethrough: Option<StyleSpec>,
    pub code: Option<StyleSpec>,
    pub code_block: Option<CodeBlockSpec>,
    pub link: Option<StyleSpec>,
    pub block_quote: Option<StyleSpec>,
    pub item: Option<StyleSpec>,
    pub hr: Option<StyleSpec>,
}

impl StyleSpec {
    fn apply(&self, base: Style) -> Result<Style, ThemeError> {
        let mut style = base;
        if let Some(c) = &self.color {
            style = style.fg(parse_color(c).ok_or_else(|| ThemeError::InvalidColor(c.clone()))?);
        }
        if let Some(c) = &self.background_color {
            style = style.bg(parse_color(c).ok_or_else(|| ThemeError::InvalidColor(c.clone()))?);
        }
        let flags = [
            (self.bold, Modifier::BOLD),
            (self.italic, Modifier::ITALIC),
            (self.underline, Modifier::UNDERLINED),
            (self.crossed_out, Modifier::CROSSED_OUT),
            (self.faint, Modifier::DIM),
        ];
        for (flag, modifier) in flags {
            style = match flag {
                Some(true) => style.add_modifier(modifier),
                Some(false) => style.remove_modifier(modifier),
                None => style,
            };
        }
        Ok(style)
    }
}

fn apply_opt(spec: &Option<StyleSpec>, target: &mut Style) -> Result<(), ThemeError> {
    if let Some(spec) = spec {
        *target = spec.apply(*target)?;
    }
    Ok(())
}

impl ThemeFile {
    pub fn apply(&self, mut theme: MarkdownTheme) -> Result<MarkdownTheme, ThemeError> {
        apply_opt(&self.document, &mut theme.document)?;
        for heading in theme.headings.iter_mut() {
            apply_opt(&self.heading, heading)?;
        }
        let levels = [&self.h1, &self.h2, &self.h3, &self.h4, &self.h5, &self.h6];
        for (spec, heading) in levels.into_iter().zip(theme.headings.iter_mut()) {
            apply_opt(spec, heading)?;
        }
        apply_opt(&self.emph, &mut theme.emph)?;
        apply_opt(&self.strong, &mut theme.strong)?;
        apply_opt(&self.strikethrough, &mut theme.strikethrough)?;
        apply_opt(&self.code, &mut theme.code)?;
        apply_opt(&self.link, &mut theme.link)?;
        apply_opt(&self.block_quote, &mut theme.block_quote)?;
        apply_opt(&self.item, &mut theme.item)?;
        apply_opt(&self.hr, &mut theme.rule)?;
        if let Some(code_block) = &self.code_block {
            theme.code_block = code_block.style.apply(theme.code_block)?;
            if let Some(name) = &code_block.theme {
                if !MarkdownTheme::has_code_theme(name) {
                    return Err(ThemeError::UnknownCodeTheme(name.clone()));
                }
                theme.code_theme = name.clone();
            }
        }
        Ok(theme)
    }
}

/// Parse a theme color: anything ratatui's `Color` parses (`"#72cedd"`, an
/// ANSI index like `"241"`, a color name), plus bare `"72cedd"` hex.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    s.parse::<Color>().ok().or_else(|| {
        let bare_hex = s.len() == 6 && s.chars().all(|c| c.is_ascii_hexdigit());
        bare_hex.then(|| format!("#{s}").parse().ok()).flatten()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn first_span_fg(renderer: &dyn Renderer, markup: &str) -> Option<Color> {
        renderer.render(markup).lines[0].spans[0].style.fg
    }

    #[test]
    fn theme_source_parsing() {
        assert_eq!(ThemeSource::parse("dark"), ThemeSource::Preset("dark".into()));
        assert_eq!(ThemeSource::parse("plain"), ThemeSource::Plain);
        assert_eq!(
            ThemeSource::parse("theme.json"),
            ThemeSource::File(PathBuf::from("theme.json"))
        );
        assert_eq!(
            ThemeSource::parse("themes/mine"),
            ThemeSource::File(PathBuf::from("themes/mine"))
        );
    }

    #[test]
    fn parse_color_forms() {
        assert_eq!(parse_color("241"), Some(Color::Indexed(241)));
        assert_eq!(parse_color("#72cedd"), Some(Color::Rgb(0x72, 0xce, 0xdd)));
        assert_eq!(parse_color("72CEDD"), Some(Color::Rgb(0x72, 0xce, 0xdd)));
        assert_eq!(parse_color("Cyan"), Some(Color::Cyan));
        assert_eq!(parse_color("bright-blue"), Some(Color::LightBlue));
        assert_eq!(parse_color("123456"), Some(Color::Rgb(0x12, 0x34, 0x56)));
        assert_eq!(parse_color("not-a-color"), None);
    }

    #[test]
    fn missing_theme_file_uses_background_preset() {
        let dir = TempDir::new().unwrap();
        let renderer = load_renderer("theme.json", dir.path(), Background::Light);
        assert_eq!(renderer.name(), "markdown");
        assert_eq!(
            first_span_fg(renderer.as_ref(), "hello"),
            MarkdownTheme::light().document.fg
        );
    }

    #[test]
    fn theme_file_overrides_preset() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("theme.json"),
            r##"{ "document": { "color": "#102030" }, "h1": { "color": "9", "bold": true },
                 "unrelated_key": { "margin": 2 } }"##,
        )
        .unwrap();
        let renderer = load_renderer("theme.json", dir.path(), Background::Dark);
        assert_eq!(
            first_span_fg(renderer.as_ref(), "hello"),
            Some(Color::Rgb(0x10, 0x20, 0x30))
        );
        assert_eq!(first_span_fg(renderer.as_ref(), "# Hi"), Some(Color::Indexed(9)));
    }

    #[test]
    fn malformed_theme_falls_back_to_plain() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("theme.json"), "{ not json").unwrap();
        let renderer = load_renderer("theme.json", dir.path(), Background::Dark);
        assert_eq!(renderer.name(), "plain");
        let text = renderer.render("# Hi");
        assert_eq!(text.lines[0].spans[0].content, "# Hi");
        assert_eq!(text.lines[0].spans[0].style, Style::default());
    }

    #[test]
    fn bad_color_falls_back_to_plain() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("theme.json"), r#"{ "code": { "color": "mauve-ish" } }"#)
            .unwrap();
        let renderer = load_renderer("theme.json", dir.path(), Background::Dark);
        assert_eq!(renderer.name(), "plain");
    }

    #[test]
    fn unknown_code_theme_is_rejected() {
        let file: ThemeFile =
            serde_json::from_str(r#"{ "code_block": { "theme": "nope", "color": "244" } }"#)
                .unwrap();
        assert!(matches!(
            file.apply(MarkdownTheme::dark()),
            Err(ThemeError::UnknownCodeTheme(_))
        ));
    }

    #[test]
    fn unknown_preset_falls_back_to_plain() {
        let dir = TempDir::new().unwrap();
        let renderer = load_renderer("solarized", dir.path(), Background::Dark);
        assert_eq!(renderer.name(), "plain");
    }

    #[test]
    fn plain_renderer_expands_tabs_and_handles_empty() {
        let text = PlainRenderer.render("a\tb");
        assert_eq!(text.lines[0].spans[0].content, "a    b");
        assert!(PlainRenderer.render("").lines.iter().all(|l| l.spans.iter().all(|s| s.content.is_empty())));
    }

    #[test]
    fn flags_can_remove_modifiers() {
        let spec = StyleSpec {
            bold: Some(false),
            italic: Some(true),
            ..Default::default()
        };
        let style = spec
            .apply(Style::default().add_modifier(Modifier::BOLD))
            .unwrap();
        assert!(!style.add_modifier.contains(Modifier::BOLD));
        assert!(style.add_modifier.contains(Modifier::ITALIC));
    }
}
