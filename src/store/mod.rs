//! Record gateway: the boundary to the backing realtime store
//!
//! The gateway owns persistence and change notification. Every mutation
//! results in a fresh full-collection [`Snapshot`] pushed to subscribers,
//! which is the contract hosted realtime databases expose for a collection
//! path. The crate ships [`InMemoryGateway`]; the trait keeps the rest of the
//! code agnostic to the actual backend.

pub mod memory;

pub use memory::InMemoryGateway;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::catalog::{Record, RecordId};
use crate::core::error::GatewayError;
use crate::core::query::Snapshot;

/// Gateway trait for one catalog collection
///
/// Implementations provide CRUD plus snapshot subscription for a specific
/// record type. The rest of the crate is agnostic to the storage mechanism.
#[async_trait]
pub trait DataGateway<T: Record>: Send + Sync {
    /// Create a new record: the gateway assigns the id and timestamps
    async fn create(&self, draft: T::Draft) -> Result<T, GatewayError>;

    /// Get a record by id
    async fn get(&self, id: &RecordId) -> Result<Option<T>, GatewayError>;

    /// Read the current full-collection snapshot
    async fn snapshot(&self) -> Result<Snapshot<T>, GatewayError>;

    /// Merge a partial update into the record with the given id
    ///
    /// Returns `None` when no such record exists.
    async fn update(&self, id: &RecordId, patch: T::Patch) -> Result<Option<T>, GatewayError>;

    /// Remove a record by id
    ///
    /// Returns whether a record was actually removed.
    async fn remove(&self, id: &RecordId) -> Result<bool, GatewayError>;

    /// Subscribe to full-collection snapshots
    ///
    /// The receiver holds the current snapshot immediately and is notified
    /// with a fresh one after every mutation.
    fn subscribe(&self) -> watch::Receiver<Snapshot<T>>;
}
