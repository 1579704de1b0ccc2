//! Command-line surface: `journal [write | view [today]]` plus a few overrides.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::core::config::CliOverrides;

#[derive(Parser, Debug)]
#[command(
    name = "journal",
    version,
    about = "Capture thoughts effortlessly in the command line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding the entry files (default: the working directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Renderer theme: a JSON theme file, or one of dark | light | plain
    #[arg(long, global = true, value_name = "PATH|PRESET")]
    pub theme: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write today's entry
    Write,
    /// Browse entries, or print today's with `view today`
    View {
        #[arg(value_enum)]
        target: Option<ViewTarget>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTarget {
    Today,
}

/// What one invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Welcome,
    Write,
    View,
    ViewToday,
}

impl Cli {
    pub fn verb(&self) -> Verb {
        match &self.command {
            None => Verb::Welcome,
            Some(Command::Write) => Verb::Write,
            Some(Command::View { target: None }) => Verb::View,
            Some(Command::View {
                target: Some(ViewTarget::Today),
            }) => Verb::ViewToday,
        }
    }

    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            entries_dir: self.dir.clone(),
            theme: self.theme.clone(),
            verbose: self.verbose,
        }
    }
}
