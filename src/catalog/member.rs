//! Member record, its draft/patch payloads, view filters and sort keys

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Collection, Record, RecordId, compare_ci, contains_ci};
use crate::core::error::ValidationError;
use crate::core::query::{SortDirection, SortKey, ViewFilter};
use crate::core::validation::{Validate, check_email, check_length, check_year, require_non_empty};

/// A library member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub joined_year: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Member {
    type Draft = MemberDraft;
    type Patch = MemberPatch;

    fn collection() -> Collection {
        Collection::Members
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: MemberDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            joined_year: draft.joined_year,
            active: draft.active,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: MemberPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if let Some(joined_year) = patch.joined_year {
            self.joined_year = joined_year;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Payload for registering a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDraft {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub joined_year: i32,
    pub active: bool,
}

impl Validate for MemberDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        errors.extend(require_non_empty("name", &self.name).err());
        errors.extend(check_length("name", &self.name, 1, 200).err());
        errors.extend(check_email("email", &self.email).err());
        errors.extend(check_year("joined_year", self.joined_year).err());
        ValidationError::check(errors)
    }
}

/// Partial update for a member; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub joined_year: Option<i32>,
    pub active: Option<bool>,
}

impl Validate for MemberPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            errors.extend(require_non_empty("name", name).err());
            errors.extend(check_length("name", name, 1, 200).err());
        }
        if let Some(email) = &self.email {
            errors.extend(check_email("email", email).err());
        }
        if let Some(joined_year) = self.joined_year {
            errors.extend(check_year("joined_year", joined_year).err());
        }
        ValidationError::check(errors)
    }
}

/// View filters over the members collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberFilters {
    pub name: String,
    pub email: String,
    pub active: Option<bool>,
}

impl ViewFilter<Member> for MemberFilters {
    fn retains(&self, member: &Member) -> bool {
        contains_ci(&member.name, &self.name)
            && contains_ci(&member.email, &self.email)
            && self.active.is_none_or(|wanted| member.active == wanted)
    }
}

/// The closed set of sortable member fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberField {
    Name,
    Email,
    JoinedYear,
    Active,
}

/// Sort key for the members view: field plus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSort {
    pub field: MemberField,
    pub direction: SortDirection,
}

impl MemberSort {
    pub fn new(field: MemberField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl Default for MemberSort {
    fn default() -> Self {
        Self::new(MemberField::Name, SortDirection::Asc)
    }
}

impl SortKey<Member> for MemberSort {
    fn compare(&self, a: &Member, b: &Member) -> Ordering {
        let ordering = match self.field {
            MemberField::Name => compare_ci(&a.name, &b.name),
            MemberField::Email => compare_ci(&a.email, &b.email),
            MemberField::JoinedYear => a.joined_year.cmp(&b.joined_year),
            MemberField::Active => a.active.cmp(&b.active),
        };
        self.direction.apply(ordering)
    }
}
