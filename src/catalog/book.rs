//! Book record, its draft/patch payloads, view filters and sort keys

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Record, RecordId, compare_ci, contains_ci};
use crate::core::error::ValidationError;
use crate::core::query::{SortDirection, SortKey, ViewFilter};
use crate::core::validation::{Validate, check_length, check_year, require_non_empty};

/// A book in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Book {
    type Draft = BookDraft;
    type Patch = BookPatch;

    fn collection() -> Collection {
        Collection::Books
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: BookDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: draft.title,
            author: draft.author,
            genre: draft.genre,
            published_year: draft.published_year,
            available: draft.available,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
        if let Some(published_year) = patch.published_year {
            self.published_year = published_year;
        }
        if let Some(available) = patch.available {
            self.available = available;
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Payload for creating a book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub available: bool,
}

impl Validate for BookDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        errors.extend(require_non_empty("title", &self.title).err());
        errors.extend(check_length("title", &self.title, 1, 200).err());
        errors.extend(require_non_empty("author", &self.author).err());
        errors.extend(check_length("author", &self.author, 1, 200).err());
        errors.extend(require_non_empty("genre", &self.genre).err());
        errors.extend(check_year("published_year", self.published_year).err());
        ValidationError::check(errors)
    }
}

/// Partial update for a book; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub published_year: Option<i32>,
    pub available: Option<bool>,
}

impl Validate for BookPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if let Some(title) = &self.title {
            errors.extend(require_non_empty("title", title).err());
            errors.extend(check_length("title", title, 1, 200).err());
        }
        if let Some(author) = &self.author {
            errors.extend(require_non_empty("author", author).err());
            errors.extend(check_length("author", author, 1, 200).err());
        }
        if let Some(genre) = &self.genre {
            errors.extend(require_non_empty("genre", genre).err());
        }
        if let Some(published_year) = self.published_year {
            errors.extend(check_year("published_year", published_year).err());
        }
        ValidationError::check(errors)
    }
}

/// View filters over the books collection
///
/// Title and author are case-insensitive substring matches, genre is an
/// exact match (empty string matches everything), availability is an exact
/// match when set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookFilters {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub available: Option<bool>,
}

impl ViewFilter<Book> for BookFilters {
    fn retains(&self, book: &Book) -> bool {
        contains_ci(&book.title, &self.title)
            && contains_ci(&book.author, &self.author)
            && (self.genre.is_empty() || book.genre == self.genre)
            && self.available.is_none_or(|wanted| book.available == wanted)
    }
}

/// The closed set of sortable book fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookField {
    Title,
    Author,
    Genre,
    PublishedYear,
    Available,
}

/// Sort key for the books view: field plus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSort {
    pub field: BookField,
    pub direction: SortDirection,
}

impl BookSort {
    pub fn new(field: BookField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl Default for BookSort {
    fn default() -> Self {
        Self::new(BookField::Title, SortDirection::Asc)
    }
}

impl SortKey<Book> for BookSort {
    fn compare(&self, a: &Book, b: &Book) -> Ordering {
        let ordering = match self.field {
            BookField::Title => compare_ci(&a.title, &b.title),
            BookField::Author => compare_ci(&a.author, &b.author),
            BookField::Genre => compare_ci(&a.genre, &b.genre),
            BookField::PublishedYear => a.published_year.cmp(&b.published_year),
            BookField::Available => a.available.cmp(&b.available),
        };
        self.direction.apply(ordering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, author: &str, genre: &str, year: i32, available: bool) -> Book {
        Book::from_draft(
            RecordId::generate(),
            BookDraft {
                title: title.to_string(),
                author: author.to_string(),
                genre: genre.to_string(),
                published_year: year,
                available,
            },
        )
    }

    #[test]
    fn test_from_draft_sets_timestamps() {
        let book = book("Kokoro", "Natsume Soseki", "Fiction", 1914, true);
        assert_eq!(book.created_at, book.updated_at);
    }

    #[test]
    fn test_apply_patch_merges_present_fields() {
        let mut book = book("Kokoro", "Natsume Soseki", "Fiction", 1914, true);
        book.apply_patch(BookPatch {
            available: Some(false),
            ..Default::default()
        });

        assert_eq!(book.title, "Kokoro");
        assert!(!book.available);
        assert!(book.updated_at >= book.created_at);
    }

    #[test]
    fn test_draft_validation_collects_all_errors() {
        let draft = BookDraft {
            title: "".to_string(),
            author: "".to_string(),
            genre: "Fiction".to_string(),
            published_year: 12,
            available: true,
        };

        let err = draft.validate().unwrap_err();
        let fields: Vec<&str> = err.errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"author"));
        assert!(fields.contains(&"published_year"));
    }

    #[test]
    fn test_patch_validation_ignores_absent_fields() {
        assert!(BookPatch::default().validate().is_ok());

        let bad = BookPatch {
            published_year: Some(3),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_filters_default_retains_everything() {
        let filters = BookFilters::default();
        assert!(filters.retains(&book("Kokoro", "Natsume Soseki", "Fiction", 1914, true)));
        assert!(filters.retains(&book("Botchan", "Natsume Soseki", "Fiction", 1906, false)));
    }

    #[test]
    fn test_title_filter_is_case_insensitive_substring() {
        let filters = BookFilters {
            title: "tok".to_string(),
            ..Default::default()
        };
        assert!(filters.retains(&book("The Tokyo Story", "X", "Fiction", 1953, true)));
        assert!(!filters.retains(&book("Kokoro", "X", "Fiction", 1914, true)));
    }

    #[test]
    fn test_genre_filter_is_exact() {
        let filters = BookFilters {
            genre: "Fiction".to_string(),
            ..Default::default()
        };
        assert!(filters.retains(&book("A", "B", "Fiction", 2000, true)));
        assert!(!filters.retains(&book("A", "B", "Science Fiction", 2000, true)));
    }

    #[test]
    fn test_availability_filter() {
        let filters = BookFilters {
            available: Some(true),
            ..Default::default()
        };
        assert!(filters.retains(&book("A", "B", "Fiction", 2000, true)));
        assert!(!filters.retains(&book("A", "B", "Fiction", 2000, false)));
    }

    #[test]
    fn test_year_sort_is_numeric() {
        let older = book("A", "B", "Fiction", 1906, true);
        let newer = book("C", "D", "Fiction", 1914, true);

        let asc = BookSort::new(BookField::PublishedYear, SortDirection::Asc);
        assert_eq!(asc.compare(&older, &newer), Ordering::Less);

        let desc = BookSort::new(BookField::PublishedYear, SortDirection::Desc);
        assert_eq!(desc.compare(&older, &newer), Ordering::Greater);
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let a = book("apple", "B", "Fiction", 2000, true);
        let b = book("Banana", "B", "Fiction", 2000, true);

        let sort = BookSort::default();
        assert_eq!(sort.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_sort_serializes_as_field_and_direction() {
        let sort = BookSort::new(BookField::PublishedYear, SortDirection::Desc);
        let json = serde_json::to_value(sort).unwrap();
        assert_eq!(json["field"], "published_year");
        assert_eq!(json["direction"], "desc");
    }
}
