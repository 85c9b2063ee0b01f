//! In-memory gateway implementation
//!
//! Reproduces the hosted realtime-store contract for tests, demos and
//! single-process deployments: last write wins, and every mutation pushes the
//! full collection snapshot to all subscribers. A read-only mode stands in
//! for a security-rules denial so the permission error path can be exercised.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::catalog::{Record, RecordId};
use crate::core::error::GatewayError;
use crate::core::events::{ChangeEvent, EventBus};
use crate::core::query::Snapshot;

use super::DataGateway;

/// In-memory gateway for one collection
///
/// Uses `RwLock` for thread-safe access. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct InMemoryGateway<T: Record> {
    records: Arc<RwLock<Snapshot<T>>>,
    snapshots: Arc<watch::Sender<Snapshot<T>>>,
    events: EventBus,
    read_only: Arc<AtomicBool>,
}

impl<T: Record> InMemoryGateway<T> {
    /// Create an empty gateway publishing change events on the given bus
    pub fn new(events: EventBus) -> Self {
        let (snapshots, _) = watch::channel(Snapshot::new());
        Self {
            records: Arc::new(RwLock::new(Snapshot::new())),
            snapshots: Arc::new(snapshots),
            events,
            read_only: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Toggle write refusal: while set, every write fails with
    /// [`GatewayError::PermissionDenied`]
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn guard_writable(&self, operation: &'static str) -> Result<(), GatewayError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(GatewayError::PermissionDenied { operation });
        }
        Ok(())
    }

    fn publish(&self, records: &Snapshot<T>, event: ChangeEvent) {
        self.snapshots.send_replace(records.clone());
        self.events.publish(event);
    }

    fn record_json(record: &T) -> serde_json::Value {
        serde_json::to_value(record).unwrap_or(serde_json::Value::Null)
    }
}

fn lock_poisoned() -> GatewayError {
    GatewayError::Unavailable {
        reason: "record store lock poisoned".to_string(),
    }
}

#[async_trait]
impl<T: Record> DataGateway<T> for InMemoryGateway<T> {
    async fn create(&self, draft: T::Draft) -> Result<T, GatewayError> {
        self.guard_writable("create")?;

        let record = T::from_draft(RecordId::generate(), draft);

        let mut records = self.records.write().map_err(|_| lock_poisoned())?;
        records.insert(record.id().clone(), record.clone());

        self.publish(
            &records,
            ChangeEvent::Created {
                collection: T::collection(),
                id: record.id().clone(),
                data: Self::record_json(&record),
            },
        );

        Ok(record)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<T>, GatewayError> {
        let records = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(records.get(id).cloned())
    }

    async fn snapshot(&self) -> Result<Snapshot<T>, GatewayError> {
        let records = self.records.read().map_err(|_| lock_poisoned())?;
        Ok(records.clone())
    }

    async fn update(&self, id: &RecordId, patch: T::Patch) -> Result<Option<T>, GatewayError> {
        self.guard_writable("update")?;

        let mut records = self.records.write().map_err(|_| lock_poisoned())?;
        let Some(record) = records.get_mut(id) else {
            return Ok(None);
        };

        record.apply_patch(patch);
        let updated = record.clone();

        self.publish(
            &records,
            ChangeEvent::Updated {
                collection: T::collection(),
                id: id.clone(),
                data: Self::record_json(&updated),
            },
        );

        Ok(Some(updated))
    }

    async fn remove(&self, id: &RecordId) -> Result<bool, GatewayError> {
        self.guard_writable("delete")?;

        let mut records = self.records.write().map_err(|_| lock_poisoned())?;
        let existed = records.shift_remove(id).is_some();

        if existed {
            self.publish(
                &records,
                ChangeEvent::Deleted {
                    collection: T::collection(),
                    id: id.clone(),
                },
            );
        }

        Ok(existed)
    }

    fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.snapshots.subscribe()
    }
}
