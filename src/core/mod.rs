//! Core module containing the view transform, error taxonomy, change events
//! and field validation shared by both catalog collections.

pub mod error;
pub mod events;
pub mod query;
pub mod validation;

pub use error::{ErrorResponse, FieldError, GatewayError, ShelfError, ValidationError};
pub use events::{ChangeEvent, EventBus, EventEnvelope};
pub use query::{PageMeta, PageView, PageWindow, Snapshot, SortDirection, SortKey, ViewFilter};
pub use validation::Validate;
