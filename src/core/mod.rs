//! # Core
//!
//! The UI-agnostic half of the journal. It knows nothing about any terminal
//! library.
//!
//! ```text
//!     ┌──────────────────────────┐
//!     │          CORE            │
//!     │  • entry   (file store)  │
//!     │  • config  (settings)    │
//!     └────────────┬─────────────┘
//!                  │
//!                  ▼
//!     ┌──────────────────────────┐
//!     │   TUI adapter (ratatui)  │
//!     └──────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`entry`]: `EntryStore`, file access for the day's entry and the entry list
//! - [`config`]: `JournalConfig` and its resolution into `ResolvedConfig`

pub mod config;
pub mod entry;
