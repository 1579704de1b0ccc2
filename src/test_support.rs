//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Frame;
use tempfile::TempDir;

use crate::core::config::ResolvedConfig;
use crate::core::entry::EntryStore;

/// Draw once into a `width` x `height` test terminal and return the buffer.
pub fn draw(width: u16, height: u16, f: impl FnOnce(&mut Frame)) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(f).unwrap();
    terminal.backend().buffer().clone()
}

/// Buffer contents as text, one line per row.
pub fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// An entry store over a fresh temporary directory. Keep the `TempDir` alive.
pub fn temp_store() -> (TempDir, EntryStore) {
    let dir = TempDir::new().unwrap();
    let store = EntryStore::new(dir.path());
    (dir, store)
}

/// Defaults with the entries directory pointed at `store`.
pub fn test_config(store: &EntryStore) -> ResolvedConfig {
    ResolvedConfig {
        entries_dir: store.dir().to_path_buf(),
        ..ResolvedConfig::defaults()
    }
}
