//! # TUI Components
//!
//! Widgets the screens are assembled from.
//!
//! ## Stateless Components (Props-Based Rendering)
//!
//! - `HelpLine`: dim key hints under a screen
//!
//! ## Stateful Components (Event-Driven)
//!
//! - `TextArea`: the Write screen's editor, with cursor blink
//! - `EntryList`: the View screen's picker
//! - `Pager`: the View screen's scrolling viewport
//!
//! A screen owns its components, forwards the events it does not handle
//! itself through `EventHandler::handle_event`, and places them with
//! `Component::render` inside its own layout.
//!
//! ```text
//! components/
//! ├── mod.rs        (this file)
//! ├── help_line.rs
//! ├── entry_list.rs
//! ├── pager.rs
//! └── text_area/    (editor, cursor tracking, wrapping helpers)
//! ```

pub mod entry_list;
pub mod help_line;
pub mod pager;
pub mod text_area;

pub use entry_list::{EntryList, EntryListEvent};
pub use help_line::HelpLine;
pub use pager::{Pager, PagerEvent};
pub use text_area::{TextArea, TextAreaEvent};
