//! Migration of the version-1 session blob
//!
//! The legacy blob was written by the original browser client: camelCase
//! keys, combined `"field-direction"` sort strings and a stringly
//! availability filter. Each piece is mapped individually; anything that does
//! not parse falls back to its default rather than failing the whole load.

use serde::Deserialize;

use crate::catalog::{
    BookField, BookFilters, BookSort, MemberField, MemberFilters, MemberSort,
};
use crate::core::query::{PageWindow, SortDirection};

use super::{SessionState, Tab, ViewState};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyState {
    #[serde(rename = "currentTab")]
    current_tab: String,
    books: LegacyCollection,
    members: LegacyCollection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyCollection {
    filters: LegacyFilters,
    sort: String,
    pagination: LegacyPagination,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyFilters {
    title: String,
    author: String,
    genre: String,
    available: String,
    name: String,
    email: String,
    active: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct LegacyPagination {
    #[serde(rename = "currentPage")]
    current_page: usize,
    #[serde(rename = "itemsPerPage")]
    items_per_page: usize,
}

impl Default for LegacyPagination {
    fn default() -> Self {
        let window = PageWindow::default();
        Self {
            current_page: window.page,
            items_per_page: window.per_page,
        }
    }
}

/// Build a current-version session from a legacy blob value
pub(super) fn from_legacy(value: serde_json::Value) -> SessionState {
    let legacy: LegacyState = match serde_json::from_value(value) {
        Ok(legacy) => legacy,
        Err(e) => {
            tracing::warn!(error = %e, "legacy session blob does not parse, using defaults");
            return SessionState::default();
        }
    };

    SessionState {
        active_tab: match legacy.current_tab.as_str() {
            "members" => Tab::Members,
            _ => Tab::Books,
        },
        books: ViewState {
            filters: BookFilters {
                title: legacy.books.filters.title,
                author: legacy.books.filters.author,
                genre: legacy.books.filters.genre,
                available: parse_tristate(&legacy.books.filters.available),
            },
            sort: book_sort(&legacy.books.sort),
            page: page_window(&legacy.books.pagination),
        },
        members: ViewState {
            filters: MemberFilters {
                name: legacy.members.filters.name,
                email: legacy.members.filters.email,
                active: parse_tristate(&legacy.members.filters.active),
            },
            sort: member_sort(&legacy.members.sort),
            page: page_window(&legacy.members.pagination),
        },
        ..SessionState::default()
    }
}

/// The legacy boolean filters were "", "true" or "false"
fn parse_tristate(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn page_window(pagination: &LegacyPagination) -> PageWindow {
    PageWindow {
        page: pagination.current_page.max(1),
        per_page: pagination.items_per_page.clamp(1, 100),
    }
}

fn split_sort(raw: &str) -> (&str, SortDirection) {
    match raw.rsplit_once('-') {
        Some((field, "desc")) => (field, SortDirection::Desc),
        Some((field, "asc")) => (field, SortDirection::Asc),
        _ => (raw, SortDirection::Asc),
    }
}

fn book_sort(raw: &str) -> BookSort {
    let (field, direction) = split_sort(raw);
    let field = match field {
        "title" => BookField::Title,
        "author" => BookField::Author,
        "genre" => BookField::Genre,
        "year" => BookField::PublishedYear,
        "available" => BookField::Available,
        _ => return BookSort::default(),
    };
    BookSort::new(field, direction)
}

fn member_sort(raw: &str) -> MemberSort {
    let (field, direction) = split_sort(raw);
    let field = match field {
        "name" => MemberField::Name,
        "email" => MemberField::Email,
        "year" => MemberField::JoinedYear,
        "active" => MemberField::Active,
        _ => return MemberSort::default(),
    };
    MemberSort::new(field, direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_legacy_blob_migrates() {
        let legacy = json!({
            "currentTab": "members",
            "books": {
                "filters": {
                    "title": "tok",
                    "author": "",
                    "genre": "Fiction",
                    "available": "true"
                },
                "sort": "year-desc",
                "pagination": {
                    "currentPage": 2,
                    "itemsPerPage": 10,
                    "totalItems": 42
                }
            },
            "members": {
                "filters": { "name": "aiko", "active": "false" },
                "sort": "name-asc",
                "pagination": { "currentPage": 1, "itemsPerPage": 5 }
            }
        });

        let state = from_legacy(legacy);

        assert_eq!(state.version, crate::session::STATE_VERSION);
        assert_eq!(state.active_tab, Tab::Members);
        assert_eq!(state.books.filters.title, "tok");
        assert_eq!(state.books.filters.genre, "Fiction");
        assert_eq!(state.books.filters.available, Some(true));
        assert_eq!(state.books.sort.field, BookField::PublishedYear);
        assert_eq!(state.books.sort.direction, SortDirection::Desc);
        assert_eq!(state.books.page.page, 2);
        assert_eq!(state.books.page.per_page, 10);
        assert_eq!(state.members.filters.name, "aiko");
        assert_eq!(state.members.filters.active, Some(false));
    }

    #[test]
    fn test_empty_legacy_blob_migrates_to_defaults() {
        let state = from_legacy(json!({}));
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn test_unknown_sort_field_falls_back() {
        assert_eq!(book_sort("isbn-asc"), BookSort::default());
        assert_eq!(book_sort(""), BookSort::default());
    }

    #[test]
    fn test_sort_without_direction_is_ascending() {
        let sort = book_sort("author");
        assert_eq!(sort.field, BookField::Author);
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_tristate_parsing() {
        assert_eq!(parse_tristate(""), None);
        assert_eq!(parse_tristate("true"), Some(true));
        assert_eq!(parse_tristate("false"), Some(false));
        assert_eq!(parse_tristate("yes"), None);
    }

    #[test]
    fn test_total_items_is_dropped() {
        // totalItems was derived display state in the legacy client; the
        // migrated schema recomputes it from the filtered view instead.
        let state = from_legacy(json!({
            "books": { "pagination": { "currentPage": 1, "itemsPerPage": 5, "totalItems": 999 } }
        }));
        assert_eq!(state.books.page, PageWindow { page: 1, per_page: 5 });
    }
}
