//! Catalog record types: books and members
//!
//! Both collections share the [`Record`] trait, which is what the gateway and
//! the CRUD service are generic over.

pub mod book;
pub mod member;

pub use book::{Book, BookDraft, BookField, BookFilters, BookPatch, BookSort};
pub use member::{Member, MemberDraft, MemberField, MemberFilters, MemberPatch, MemberSort};

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::core::validation::Validate;

/// Opaque record identifier, assigned by the gateway on creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The two catalog collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Books,
    Members,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Books => "books",
            Collection::Members => "members",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog record with a gateway-assigned id and managed timestamps
///
/// `Draft` is the payload for a create (the gateway turns it into a full
/// record), `Patch` the payload for a partial update (present fields are
/// merged over the stored record).
pub trait Record: Clone + Send + Sync + Serialize + 'static {
    type Draft: Validate + DeserializeOwned + Send;
    type Patch: Validate + DeserializeOwned + Send;

    /// The collection this record type lives in
    fn collection() -> Collection;

    /// Get the unique identifier for this record
    fn id(&self) -> &RecordId;

    /// Build a full record from a draft and a fresh id
    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;

    /// Merge a patch over this record, refreshing `updated_at`
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Refresh the `updated_at` timestamp
    fn touch(&mut self);
}

/// Case-insensitive substring match; an empty needle matches everything
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive lexicographic compare
///
/// Ties are left to the caller's stable sort, so records that differ only in
/// case keep their snapshot order.
pub(crate) fn compare_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
