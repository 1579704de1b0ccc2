//! Colors shared by the screens, chosen for the terminal's background.
//!
//! The background is settled once, before the terminal is taken over and
//! before any screen is built. `auto` queries the terminal for its background
//! color (OSC 11 on the tty) and assumes a dark background when the terminal
//! does not answer in time or is not a terminal at all.

use std::fmt;
use std::time::Duration;

use log::debug;
use ratatui::style::{Color, Modifier, Style};
use terminal_colorsaurus::{ColorScheme, QueryOptions, color_scheme};

use crate::core::config::BackgroundSetting;

/// Longest wait for the terminal to report its background color.
const QUERY_TIMEOUT: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Dark,
    Light,
}

impl Background {
    pub fn resolve(setting: BackgroundSetting) -> Self {
        match setting {
            BackgroundSetting::Dark => Background::Dark,
            BackgroundSetting::Light => Background::Light,
            BackgroundSetting::Auto => Self::detect(),
        }
    }

    /// Ask the terminal. Falls back to `Dark`.
    pub fn detect() -> Self {
        let mut options = QueryOptions::default();
        options.timeout = QUERY_TIMEOUT;
        let detected = Self::from_query(color_scheme(options));
        debug!("Terminal background: {:?}", detected);
        detected
    }

    fn from_query<E: fmt::Display>(answer: Result<ColorScheme, E>) -> Self {
        match answer {
            Ok(ColorScheme::Light) => Background::Light,
            Ok(_) => Background::Dark,
            Err(e) => {
                debug!("Background query unanswered ({}), assuming dark", e);
                Background::Dark
            }
        }
    }
}

/// Named colors used across the screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Background,
    /// Accent: picker cursor, date header, welcome banner.
    pub primary: Color,
    /// Help lines and other secondary text.
    pub dim: Color,
    pub success: Color,
    pub check_mark: Color,
    pub error: Color,
    /// Base text color handed to the markup renderer.
    pub text: Color,
}

impl Palette {
    pub fn for_background(background: Background) -> Self {
        match background {
            Background::Dark => Self {
                background,
                primary: Color::Rgb(0x72, 0xce, 0xdd),
                dim: Color::Indexed(241),
                success: Color::Rgb(0x00, 0xff, 0x00),
                check_mark: Color::Rgb(0x73, 0xf5, 0x9f),
                error: Color::Rgb(0xff, 0x5f, 0x87),
                text: Color::Indexed(252),
            },
            Background::Light => Self {
                background,
                primary: Color::Rgb(0x1f, 0x7a, 0x8c),
                dim: Color::Indexed(245),
                success: Color::Rgb(0x00, 0x87, 0x00),
                check_mark: Color::Rgb(0x1a, 0x9e, 0x4b),
                error: Color::Rgb(0xd7, 0x00, 0x5f),
                text: Color::Indexed(236),
            },
        }
    }

    pub fn primary_style(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_background(Background::Dark)
    }
}
