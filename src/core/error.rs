//! Typed error handling for the shelf crate
//!
//! Every failure a handler can surface is covered by [`ShelfError`], so
//! clients can handle errors specifically instead of matching on strings.
//!
//! # Error categories
//!
//! - [`GatewayError`]: the backing record store is unreachable or refused a write
//! - [`ValidationError`]: a draft or patch was rejected before reaching the gateway
//! - `NotFound`: a record id does not exist in its collection
//! - `Render`: a table template failed to render
//! - `Internal`: anything that should not happen in normal operation

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

use crate::catalog::{Collection, RecordId};
use crate::render::RenderError;

/// The main error type for the shelf crate
#[derive(Debug)]
pub enum ShelfError {
    /// The backing record store failed or refused the operation
    Gateway(GatewayError),

    /// A draft or patch failed field validation
    Validation(ValidationError),

    /// No record with the given id exists in the collection
    NotFound { collection: Collection, id: RecordId },

    /// A table template failed to render
    Render(RenderError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ShelfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShelfError::Gateway(e) => write!(f, "{}", e),
            ShelfError::Validation(e) => write!(f, "{}", e),
            ShelfError::NotFound { collection, id } => {
                write!(f, "no record '{}' in {}", id, collection)
            }
            ShelfError::Render(e) => write!(f, "{}", e),
            ShelfError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for ShelfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShelfError::Gateway(e) => Some(e),
            ShelfError::Validation(e) => Some(e),
            ShelfError::Render(e) => Some(e),
            ShelfError::NotFound { .. } | ShelfError::Internal(_) => None,
        }
    }
}

impl From<GatewayError> for ShelfError {
    fn from(e: GatewayError) -> Self {
        ShelfError::Gateway(e)
    }
}

impl From<ValidationError> for ShelfError {
    fn from(e: ValidationError) -> Self {
        ShelfError::Validation(e)
    }
}

impl From<RenderError> for ShelfError {
    fn from(e: RenderError) -> Self {
        ShelfError::Render(e)
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShelfError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShelfError::Gateway(e) => e.status_code(),
            ShelfError::Validation(_) => StatusCode::BAD_REQUEST,
            ShelfError::NotFound { .. } => StatusCode::NOT_FOUND,
            ShelfError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ShelfError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShelfError::Gateway(GatewayError::Unavailable { .. }) => "GATEWAY_UNAVAILABLE",
            ShelfError::Gateway(GatewayError::PermissionDenied { .. }) => "PERMISSION_DENIED",
            ShelfError::Validation(_) => "VALIDATION_FAILED",
            ShelfError::NotFound { .. } => "NOT_FOUND",
            ShelfError::Render(_) => "RENDER_ERROR",
            ShelfError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShelfError::NotFound { collection, id } => Some(serde_json::json!({
                "collection": collection.as_str(),
                "id": id.as_str(),
            })),
            ShelfError::Validation(e) => Some(serde_json::json!({ "fields": e.errors })),
            _ => None,
        }
    }
}

impl IntoResponse for ShelfError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Gateway errors
// =============================================================================

/// Errors surfaced by the backing record store
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The store could not be reached or its state is unusable
    Unavailable { reason: String },

    /// The store refused a write (the hosted-store equivalent of a
    /// security-rules denial)
    PermissionDenied { operation: &'static str },
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Unavailable { reason } => {
                write!(f, "record store unavailable: {}", reason)
            }
            GatewayError::PermissionDenied { operation } => {
                write!(f, "record store denied '{}'", operation)
            }
        }
    }
}

impl std::error::Error for GatewayError {}

// =============================================================================
// Validation errors
// =============================================================================

/// A single rejected field with a human-readable reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validation failure for a draft or patch, one entry per rejected field
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Turn a list of collected field errors into a result
    pub fn check(errors: Vec<FieldError>) -> Result<(), ValidationError> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors })
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.errors.iter().map(|e| e.field).collect();
        write!(f, "validation failed for: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationError {}
