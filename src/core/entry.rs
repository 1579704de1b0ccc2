//! # Entry Store
//!
//! All filesystem access for journal entries. One entry per calendar day,
//! stored as `<Month>-<DD>-<YYYY>.md` inside the store directory (the working
//! directory unless configured otherwise).
//!
//! The store holds nothing but its directory. "Today" is computed from the
//! local clock on every call, so a session left open past midnight writes to
//! the new day's file.
//!
//! Empty text stands for both "no entry yet" and "empty entry". Callers that
//! care about the difference check [`EntryStore::today_exists`] first.
//!
//! The two readers treat bytes that are not UTF-8 differently:
//!
//! - [`EntryStore::read_today_or_create`] feeds the editor, whose buffer is
//!   written back on exit. It refuses such a file (`InvalidData`) so that a
//!   lossy decode never replaces the bytes on disk with U+FFFD.
//! - [`EntryStore::read`] only feeds the read-only viewer, so it decodes
//!   lossily and always shows something.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use log::{debug, info};

/// Extension every entry file carries.
pub const ENTRY_EXTENSION: &str = "md";

/// Status text shown after a successful save.
pub const SAVED_STATUS: &str = "Entry saved";
/// Status text shown after a failed save.
pub const SAVE_FAILED_STATUS: &str = "An error occurred";

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum EntryError {
    /// The entry file does not exist.
    NotFound { path: PathBuf },
    /// Any other filesystem failure.
    Io { path: PathBuf, source: io::Error },
}

impl EntryError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            EntryError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            EntryError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, EntryError::NotFound { .. })
    }
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryError::NotFound { path } => write!(f, "{}: no such entry", path.display()),
            EntryError::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for EntryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EntryError::NotFound { .. } => None,
            EntryError::Io { source, .. } => Some(source),
        }
    }
}

// ============================================================================
// Naming
// ============================================================================

/// File name for the entry of `date`, e.g. `January-02-2024.md`.
pub fn entry_file_name(date: NaiveDate) -> String {
    format!("{}.{ENTRY_EXTENSION}", date.format("%B-%d-%Y"))
}

/// Human date label shown above the editor, e.g. `January 02 2024`.
pub fn date_label(date: NaiveDate) -> String {
    date.format("%B %d %Y").to_string()
}

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Map a save result to the status line text.
pub fn save_status<T>(result: &Result<T, EntryError>) -> &'static str {
    match result {
        Ok(_) => SAVED_STATUS,
        Err(_) => SAVE_FAILED_STATUS,
    }
}

// ============================================================================
// Store
// ============================================================================

#[derive(Debug, Clone)]
pub struct EntryStore {
    dir: PathBuf,
}

impl EntryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the process working directory.
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a named entry file inside the store.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn today_path(&self) -> PathBuf {
        self.path_of(&entry_file_name(today()))
    }

    pub fn today_exists(&self) -> bool {
        self.today_path().is_file()
    }

    /// Write `body` to today's entry, replacing any previous contents.
    pub fn write_today(&self, body: &str) -> Result<(), EntryError> {
        let path = self.today_path();
        let mut file = open_for_write(&path).map_err(|e| EntryError::from_io(&path, e))?;
        file.write_all(body.as_bytes())
            .map_err(|e| EntryError::from_io(&path, e))?;
        info!("Saved entry {} ({} bytes)", path.display(), body.len());
        Ok(())
    }

    /// Return today's entry text, creating an empty file if there is none.
    ///
    /// After a successful call the file exists on disk.
    pub fn read_today_or_create(&self) -> Result<String, EntryError> {
        let path = self.today_path();
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!("Loaded entry {} ({} bytes)", path.display(), text.len());
                Ok(text)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                open_for_write(&path).map_err(|e| EntryError::from_io(&path, e))?;
                info!("Created empty entry {}", path.display());
                Ok(String::new())
            }
            Err(e) => Err(EntryError::from_io(&path, e)),
        }
    }

    /// Read a named entry file in full.
    pub fn read(&self, name: &str) -> Result<String, EntryError> {
        let path = self.path_of(name);
        let bytes = fs::read(&path).map_err(|e| EntryError::from_io(&path, e))?;
        debug!("Read {} ({} bytes)", path.display(), bytes.len());
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Remove today's entry. A missing file is reported as `NotFound`.
    pub fn delete_today(&self) -> Result<(), EntryError> {
        let path = self.today_path();
        fs::remove_file(&path).map_err(|e| EntryError::from_io(&path, e))?;
        info!("Deleted entry {}", path.display());
        Ok(())
    }

    /// One-shot scan of the store for `.md` files, in directory iteration order.
    pub fn list_entries(&self) -> Result<Vec<String>, EntryError> {
        let read_dir = fs::read_dir(&self.dir).map_err(|e| EntryError::from_io(&self.dir, e))?;
        let mut names = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|e| EntryError::from_io(&self.dir, e))?;
            let path = dir_entry.path();
            let is_entry = path
                .extension()
                .is_some_and(|ext| ext == ENTRY_EXTENSION);
            if is_entry && let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        debug!("Found {} entries in {}", names.len(), self.dir.display());
        Ok(names)
    }
}

/// Open (creating or truncating) a file readable and writable by the user.
fn open_for_write(path: &Path) -> io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, EntryStore) {
        let dir = TempDir::new().unwrap();
        let store = EntryStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn invalid_utf8_is_refused_for_editing_but_shown_for_viewing() {
        let (_dir, store) = store();
        let bytes = b"caf\xe9 notes".to_vec();
        fs::write(store.today_path(), &bytes).unwrap();

        match store.read_today_or_create() {
            Err(EntryError::Io { source, .. }) => {
                assert_eq!(source.kind(), io::ErrorKind::InvalidData)
            }
            other => panic!("expected InvalidData, got {other:?}"),
        }
        assert_eq!(fs::read(store.today_path()).unwrap(), bytes, "file left untouched");

        let shown = store.read(&entry_file_name(today())).unwrap();
        assert_eq!(shown, "caf\u{fffd} notes");
    }

    #[test]
    fn file_name_uses_full_month_and_padded_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(entry_file_name(date), "January-02-2024.md");
        assert_eq!(date_label(date), "January 02 2024");
    }

    #[test]
    fn write_then_read_returns_same_text() {
        let (_dir, store) = store();
        let body = "# Today\n\nIt rained.  \n\ttabbed\n";
        store.write_today(body).unwrap();
        assert_eq!(store.read_today_or_create().unwrap(), body);
    }

    #[test]
    fn write_replaces_previous_contents() {
        let (_dir, store) = store();
        store.write_today("a much longer first draft").unwrap();
        store.write_today("short").unwrap();
        assert_eq!(store.read_today_or_create().unwrap(), "short");
    }

    #[test]
    fn read_today_or_create_creates_empty_file() {
        let (_dir, store) = store();
        assert!(!store.today_exists());
        assert_eq!(store.read_today_or_create().unwrap(), "");
        assert!(store.today_exists());
    }

    #[test]
    fn read_today_or_create_is_idempotent() {
        let (_dir, store) = store();
        store.write_today("hello").unwrap();
        let first = store.read_today_or_create().unwrap();
        let second = store.read_today_or_create().unwrap();
        assert_eq!(first, second);
        assert_eq!(store.list_entries().unwrap().len(), 1);
    }

    #[test]
    fn delete_missing_entry_is_not_found() {
        let (_dir, store) = store();
        let err = store.delete_today().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_removes_file() {
        let (_dir, store) = store();
        store.read_today_or_create().unwrap();
        store.delete_today().unwrap();
        assert!(!store.today_exists());
    }

    #[test]
    fn read_missing_named_entry_fails() {
        let (_dir, store) = store();
        assert!(store.read("March-01-2020.md").unwrap_err().is_not_found());
    }

    #[test]
    fn list_entries_filters_markdown() {
        let (dir, store) = store();
        fs::write(dir.path().join("January-02-2024.md"), "# Hi").unwrap();
        fs::write(dir.path().join("notes.txt"), "nope").unwrap();
        fs::write(dir.path().join("theme.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();

        let entries = store.list_entries().unwrap();
        assert_eq!(entries, vec!["January-02-2024.md".to_string()]);
    }

    #[test]
    fn list_entries_on_missing_dir_fails() {
        let store = EntryStore::new("/definitely/not/a/journal/dir");
        assert!(store.list_entries().is_err());
    }

    #[test]
    fn save_status_text() {
        let ok: Result<(), EntryError> = Ok(());
        assert_eq!(save_status(&ok), "Entry saved");
        let err: Result<(), EntryError> = Err(EntryError::NotFound {
            path: PathBuf::from("x.md"),
        });
        assert_eq!(save_status(&err), "An error occurred");
    }

    #[cfg(unix)]
    #[test]
    fn new_entry_is_user_read_write_only() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = store();
        store.write_today("private").unwrap();
        let mode = fs::metadata(store.today_path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
