//! # Shelf
//!
//! A library catalog manager backed by a realtime record store. A librarian
//! client filters, sorts and paginates books and members, performs CRUD on
//! them, and keeps its view state (filters, sort, page, active tab) across
//! restarts.
//!
//! ## Features
//!
//! - **Snapshot views**: the gateway pushes the full collection on every
//!   change; views are a pure transform over the latest snapshot
//! - **Typed view state**: closed enums of sortable fields, typed filters,
//!   versioned persisted session with explicit migration
//! - **Validated writes**: drafts and patches are checked before they reach
//!   the gateway, so malformed records cannot exist
//! - **Confirmation-guarded deletes**: a declined confirmation performs no
//!   gateway call
//! - **Change feed**: every mutation is broadcast to websocket subscribers
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use shelf::prelude::*;
//!
//! let events = EventBus::new(1024);
//! let gateway = InMemoryGateway::<Book>::new(events.clone());
//! let books = CatalogService::new(Arc::new(gateway));
//!
//! let created = books.create(BookDraft {
//!     title: "Snow Country".to_string(),
//!     author: "Yasunari Kawabata".to_string(),
//!     genre: "Fiction".to_string(),
//!     published_year: 1947,
//!     available: true,
//! }).await?;
//!
//! let snapshot = books.snapshot().await?;
//! let page = page_view(&snapshot, &BookFilters::default(), &BookSort::default(), &PageWindow::default());
//! assert_eq!(page.items[0].id, created.id);
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod render;
pub mod server;
pub mod service;
pub mod session;
pub mod store;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Catalog ===
    pub use crate::catalog::{
        Book, BookDraft, BookField, BookFilters, BookPatch, BookSort, Collection, Member,
        MemberDraft, MemberField, MemberFilters, MemberPatch, MemberSort, Record, RecordId,
    };

    // === Core ===
    pub use crate::core::error::{GatewayError, ShelfError, ValidationError};
    pub use crate::core::events::{ChangeEvent, EventBus, EventEnvelope};
    pub use crate::core::query::{
        PageMeta, PageView, PageWindow, Snapshot, SortDirection, page_view,
    };
    pub use crate::core::validation::Validate;

    // === Gateway and services ===
    pub use crate::service::{CatalogService, Confirmation, DeleteOutcome, Notice};
    pub use crate::store::{DataGateway, InMemoryGateway};

    // === Session ===
    pub use crate::session::{SessionState, SessionStore, Tab, ViewState};

    // === Config and server ===
    pub use crate::config::{AppConfig, SeedData};
    pub use crate::render::TableRenderer;
    pub use crate::server::{AppState, build_router, build_state, serve};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
