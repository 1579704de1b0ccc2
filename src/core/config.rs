//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → CLI flags.
//!
//! Config lives at `~/.journal/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct JournalConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub write: WriteConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub entries_dir: Option<PathBuf>,
    pub background: Option<BackgroundSetting>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RendererConfig {
    pub theme: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WriteConfig {
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub placeholder: Option<String>,
    pub status_timeout_ms: Option<u64>,
}

/// Terminal background selection. `Auto` queries the terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundSetting {
    #[default]
    Auto,
    Dark,
    Light,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_THEME: &str = "theme.json";
pub const DEFAULT_EDITOR_WIDTH: u16 = 50;
pub const DEFAULT_EDITOR_HEIGHT: u16 = 15;
pub const DEFAULT_PLACEHOLDER: &str = "How was your today?";
pub const DEFAULT_STATUS_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub entries_dir: PathBuf,
    pub background: BackgroundSetting,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub theme: String,
    pub editor_width: u16,
    pub editor_height: u16,
    pub placeholder: String,
    pub status_timeout_ms: u64,
}

/// Values taken from command-line flags (None = not specified).
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub entries_dir: Option<PathBuf>,
    pub theme: Option<String>,
    pub verbose: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.journal`, the home of the config file and log.
pub fn journal_home() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".journal"))
}

/// Returns the path to `~/.journal/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    journal_home().map(|h| h.join("config.toml"))
}

/// Load config from `~/.journal/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `JournalConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<JournalConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(JournalConfig::default());
        }
    };
    load_config_from(&path)
}

/// Load config from an explicit path, generating a default file if absent.
pub fn load_config_from(path: &Path) -> Result<JournalConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(JournalConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: JournalConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Journal Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → CLI flags.

# [general]
# entries_dir = "."                  # Where entries live; "." is the directory you run journal from
# background = "auto"                # "auto", "dark" or "light"
# log_level = "info"                 # "error", "warn", "info", "debug", "trace"
# log_file = "/home/me/.journal/journal.log"

# [renderer]
# theme = "theme.json"               # JSON theme path (relative to entries_dir) or "dark", "light", "plain"

# [write]
# width = 50
# height = 15
# placeholder = "How was your today?"
# status_timeout_ms = 2000
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → CLI.
pub fn resolve(config: &JournalConfig, cli: &CliOverrides) -> ResolvedConfig {
    let entries_dir = cli
        .entries_dir
        .clone()
        .or_else(|| config.general.entries_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let theme = cli
        .theme
        .clone()
        .or_else(|| config.renderer.theme.clone())
        .unwrap_or_else(|| DEFAULT_THEME.to_string());

    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config
            .general
            .log_level
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    };

    let log_file = config
        .general
        .log_file
        .clone()
        .or_else(|| journal_home().map(|h| h.join("journal.log")));

    ResolvedConfig {
        entries_dir,
        background: config.general.background.unwrap_or_default(),
        log_level,
        log_file,
        theme,
        editor_width: config.write.width.unwrap_or(DEFAULT_EDITOR_WIDTH),
        editor_height: config.write.height.unwrap_or(DEFAULT_EDITOR_HEIGHT),
        placeholder: config
            .write
            .placeholder
            .clone()
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
        status_timeout_ms: config
            .write
            .status_timeout_ms
            .unwrap_or(DEFAULT_STATUS_TIMEOUT_MS),
    }
}

impl ResolvedConfig {
    /// Defaults with no config file and no flags.
    pub fn defaults() -> Self {
        resolve(&JournalConfig::default(), &CliOverrides::default())
    }
}
