//! Internal event system for change notifications
//!
//! The [`EventBus`] decouples catalog mutations (REST handlers, seeding) from
//! notification consumers (the websocket feed). It uses `tokio::sync::broadcast`
//! so any number of subscribers can observe every mutation.
//!
//! # Usage
//!
//! ```rust,ignore
//! let bus = EventBus::new(1024);
//!
//! // Subscribe to events
//! let mut rx = bus.subscribe();
//!
//! // Publish an event (non-blocking, fire-and-forget)
//! bus.publish(ChangeEvent::Created {
//!     collection: Collection::Books,
//!     id: RecordId::generate(),
//!     data: json!({"title": "Snow Country"}),
//! });
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::catalog::{Collection, RecordId};

/// A catalog mutation observed by the event bus
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A record was created
    Created {
        collection: Collection,
        id: RecordId,
        data: serde_json::Value,
    },
    /// A record was partially updated
    Updated {
        collection: Collection,
        id: RecordId,
        data: serde_json::Value,
    },
    /// A record was deleted
    Deleted {
        collection: Collection,
        id: RecordId,
    },
}

impl ChangeEvent {
    /// Get the collection this event relates to
    pub fn collection(&self) -> Collection {
        match self {
            ChangeEvent::Created { collection, .. }
            | ChangeEvent::Updated { collection, .. }
            | ChangeEvent::Deleted { collection, .. } => *collection,
        }
    }

    /// Get the record id this event relates to
    pub fn record_id(&self) -> &RecordId {
        match self {
            ChangeEvent::Created { id, .. }
            | ChangeEvent::Updated { id, .. }
            | ChangeEvent::Deleted { id, .. } => id,
        }
    }

    /// Get the action name (created, updated, deleted)
    pub fn action(&self) -> &'static str {
        match self {
            ChangeEvent::Created { .. } => "created",
            ChangeEvent::Updated { .. } => "updated",
            ChangeEvent::Deleted { .. } => "deleted",
        }
    }
}

/// Envelope wrapping a change event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: ChangeEvent,
}

impl EventEnvelope {
    /// Create a new event envelope
    pub fn new(event: ChangeEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone and shareable across tasks. Publishing never blocks and
/// never fails; subscribers that lag past the channel capacity receive a
/// `Lagged` error on their next recv().
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of receivers that will see the event. With no
    /// subscribers the event is simply dropped.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events
    ///
    /// Events published before this call are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Get the current number of active subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
