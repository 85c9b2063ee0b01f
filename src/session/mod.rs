//! Per-session view state, persisted across restarts
//!
//! The session blob holds what the UI controls select: active tab, filters,
//! sort and page window per collection. It is read once at startup and
//! written back on every state-affecting mutation.
//!
//! The blob is versioned. Version 1 is the legacy browser-client shape
//! (combined `"title-asc"` sort strings, stringly `""/"true"/"false"`
//! availability filters) and is migrated field by field on load. Anything
//! unreadable falls back to defaults with a warning; it is never an error.

mod migrate;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{BookFilters, BookSort, MemberFilters, MemberSort};
use crate::core::query::PageWindow;

/// Current session blob schema version
pub const STATE_VERSION: u32 = 2;

/// Which collection the UI is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Books,
    Members,
}

/// View state for one collection: filters, sort key and page window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState<F: Default, S: Default> {
    pub filters: F,
    pub sort: S,
    pub page: PageWindow,
}

/// The whole persisted session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub version: u32,
    pub active_tab: Tab,
    pub books: ViewState<BookFilters, BookSort>,
    pub members: ViewState<MemberFilters, MemberSort>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            active_tab: Tab::default(),
            books: ViewState::default(),
            members: ViewState::default(),
        }
    }
}

/// Errors from explicitly flushing the session blob
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to write session blob: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode session blob: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Owns the in-memory session state and its on-disk blob
///
/// Mutations apply in memory first and then persist best-effort: a failed
/// write is logged, never surfaced as a request error, so a full disk cannot
/// block catalog work.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Load the session blob at `path`, falling back to defaults
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(raw) => Self::parse(&raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => SessionState::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "session blob unreadable, using defaults");
                SessionState::default()
            }
        };

        Self {
            path,
            state: RwLock::new(state),
        }
    }

    fn parse(raw: &str) -> SessionState {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "session blob is not valid JSON, using defaults");
                return SessionState::default();
            }
        };

        match value.get("version").and_then(|v| v.as_u64()) {
            Some(2) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "session blob does not match schema, using defaults");
                SessionState::default()
            }),
            Some(version) => {
                tracing::warn!(version, "unknown session schema version, using defaults");
                SessionState::default()
            }
            None => {
                tracing::info!("migrating legacy session blob");
                migrate::from_legacy(value)
            }
        }
    }

    /// The blob path this store persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A copy of the current state
    pub fn state(&self) -> SessionState {
        self.read_guard().clone()
    }

    /// Write the current state to disk
    pub fn flush(&self) -> Result<(), SessionError> {
        let state = self.state();
        let raw = serde_json::to_string_pretty(&state)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn read_guard(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn mutate(&self, apply: impl FnOnce(&mut SessionState)) -> SessionState {
        let updated = {
            let mut guard = match self.state.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            apply(&mut guard);
            guard.clone()
        };

        if let Err(e) = self.flush() {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist session state");
        }

        updated
    }

    // === Mutations mirroring the UI controls ===
    //
    // Filter and page-size changes reset the page to 1, as a shrunken result
    // set would otherwise land the user on an empty page.

    pub fn set_active_tab(&self, tab: Tab) -> SessionState {
        self.mutate(|s| s.active_tab = tab)
    }

    pub fn set_book_filters(&self, filters: BookFilters) -> SessionState {
        self.mutate(|s| {
            s.books.filters = filters;
            s.books.page.page = 1;
        })
    }

    pub fn set_book_sort(&self, sort: BookSort) -> SessionState {
        self.mutate(|s| s.books.sort = sort)
    }

    pub fn set_book_page(&self, page: usize) -> SessionState {
        self.mutate(|s| s.books.page.page = page.max(1))
    }

    pub fn set_book_per_page(&self, per_page: usize) -> SessionState {
        self.mutate(|s| {
            s.books.page.per_page = per_page.clamp(1, 100);
            s.books.page.page = 1;
        })
    }

    pub fn set_member_filters(&self, filters: MemberFilters) -> SessionState {
        self.mutate(|s| {
            s.members.filters = filters;
            s.members.page.page = 1;
        })
    }

    pub fn set_member_sort(&self, sort: MemberSort) -> SessionState {
        self.mutate(|s| s.members.sort = sort)
    }

    pub fn set_member_page(&self, page: usize) -> SessionState {
        self.mutate(|s| s.members.page.page = page.max(1))
    }

    pub fn set_member_per_page(&self, per_page: usize) -> SessionState {
        self.mutate(|s| {
            s.members.page.per_page = per_page.clamp(1, 100);
            s.members.page.page = 1;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BookField;
    use crate::core::query::SortDirection;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::load(dir.path().join("session.json"))
    }

    #[test]
    fn test_missing_blob_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.state(), SessionState::default());
    }

    #[test]
    fn test_corrupt_blob_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json at all").unwrap();

        let store = SessionStore::load(&path);
        assert_eq!(store.state(), SessionState::default());
    }

    #[test]
    fn test_unknown_future_version_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"version": 99, "active_tab": "members"}"#).unwrap();

        let store = SessionStore::load(&path);
        assert_eq!(store.state(), SessionState::default());
    }

    #[test]
    fn test_mutations_persist_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::load(&path);
        store.set_active_tab(Tab::Members);
        store.set_book_sort(BookSort::new(BookField::PublishedYear, SortDirection::Desc));
        store.set_book_page(3);

        let reloaded = SessionStore::load(&path);
        let state = reloaded.state();
        assert_eq!(state.active_tab, Tab::Members);
        assert_eq!(state.books.sort.field, BookField::PublishedYear);
        assert_eq!(state.books.page.page, 3);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set_book_page(4);

        let state = store.set_book_filters(BookFilters {
            title: "tok".to_string(),
            ..Default::default()
        });

        assert_eq!(state.books.page.page, 1);
        assert_eq!(state.books.filters.title, "tok");
    }

    #[test]
    fn test_per_page_change_resets_page() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set_member_page(7);

        let state = store.set_member_per_page(20);
        assert_eq!(state.members.page.page, 1);
        assert_eq!(state.members.page.per_page, 20);
    }

    #[test]
    fn test_sort_change_keeps_page() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.set_book_page(2);

        let state = store.set_book_sort(BookSort::new(BookField::Author, SortDirection::Asc));
        assert_eq!(state.books.page.page, 2);
    }

    #[test]
    fn test_page_floor_is_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let state = store.set_book_page(0);
        assert_eq!(state.books.page.page, 1);
    }
}
