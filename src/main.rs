use std::fs::File;
use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use journal::cli::Cli;
use journal::core::config::{self, ResolvedConfig};
use journal::tui::program::ProgramError;
use journal::tui::{self, LaunchError};
use journal::tui::style::Background;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config = config::resolve(&file_config, &cli.overrides());
    init_logging(&config);

    let verb = cli.verb();
    log::info!("Journal starting: {:?}", verb);
    log::debug!("Resolved config: {:?}", config);

    // Settled before any screen or renderer is built
    let background = Background::resolve(config.background);

    match tui::launch(verb, &config, background) {
        Ok(()) => ExitCode::SUCCESS,
        Err(LaunchError::Program(ProgramError::Aborted(reason))) => {
            log::error!("Screen aborted: {}", reason);
            eprintln!("Error: {reason}");
            ExitCode::FAILURE
        }
        Err(LaunchError::Program(e)) => {
            log::error!("Program failed: {}", e);
            println!("Error running program: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// File logger; the terminal belongs to the TUI. Runs without logging if the
/// file cannot be opened.
fn init_logging(config: &ResolvedConfig) {
    let Some(path) = &config.log_file else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let level = LevelFilter::from_str(&config.log_level).unwrap_or(LevelFilter::Info);
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create(path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}
