//! CRUD adapter between the HTTP surface and the gateway
//!
//! Drafts and patches are validated before anything reaches the gateway, a
//! delete only goes through with an explicit confirmation, and gateway
//! failures can be wrapped as [`Notice`]s for non-blocking display.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::catalog::{Record, RecordId};
use crate::core::error::ShelfError;
use crate::core::query::Snapshot;
use crate::core::validation::Validate;
use crate::store::DataGateway;

/// Whether the user confirmed a destructive action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

/// What a delete request actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A non-blocking, user-visible notice
///
/// Gateway failures are surfaced through these instead of disappearing as
/// silent no-ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Wrap an error for display; client errors warn, server errors error
    pub fn from_error(error: &ShelfError) -> Self {
        let level = if error.status_code().is_server_error() {
            NoticeLevel::Error
        } else {
            NoticeLevel::Warning
        };
        Self {
            level,
            message: error.to_string(),
        }
    }
}

/// Validated CRUD operations over one collection
#[derive(Clone)]
pub struct CatalogService<T: Record> {
    gateway: Arc<dyn DataGateway<T>>,
}

impl<T: Record> CatalogService<T> {
    pub fn new(gateway: Arc<dyn DataGateway<T>>) -> Self {
        Self { gateway }
    }

    /// Validate a draft and create the record
    pub async fn create(&self, draft: T::Draft) -> Result<T, ShelfError> {
        draft.validate()?;
        let record = self.gateway.create(draft).await?;
        tracing::info!(collection = %T::collection(), id = %record.id(), "record created");
        Ok(record)
    }

    /// Get a record by id
    pub async fn get(&self, id: &RecordId) -> Result<Option<T>, ShelfError> {
        Ok(self.gateway.get(id).await?)
    }

    /// Read the current full-collection snapshot
    pub async fn snapshot(&self) -> Result<Snapshot<T>, ShelfError> {
        Ok(self.gateway.snapshot().await?)
    }

    /// Subscribe to full-collection snapshots
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.gateway.subscribe()
    }

    /// Validate a patch and merge it into the record
    pub async fn update(&self, id: &RecordId, patch: T::Patch) -> Result<T, ShelfError> {
        patch.validate()?;
        match self.gateway.update(id, patch).await? {
            Some(record) => {
                tracing::info!(collection = %T::collection(), id = %id, "record updated");
                Ok(record)
            }
            None => Err(ShelfError::NotFound {
                collection: T::collection(),
                id: id.clone(),
            }),
        }
    }

    /// Delete a record, guarded by an explicit confirmation
    ///
    /// A declined confirmation performs no gateway call at all.
    pub async fn delete(
        &self,
        id: &RecordId,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, ShelfError> {
        if confirmation == Confirmation::Declined {
            tracing::debug!(collection = %T::collection(), id = %id, "delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        if self.gateway.remove(id).await? {
            tracing::info!(collection = %T::collection(), id = %id, "record deleted");
            Ok(DeleteOutcome::Deleted)
        } else {
            Err(ShelfError::NotFound {
                collection: T::collection(),
                id: id.clone(),
            })
        }
    }
}
