//! # Session Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ValidationError ──────────────────────────┐                           │
//! │  CoreError (ChannelNotFound) ───────────────┤                           │
//! │                                             ▼                           │
//! │  DbError ──► StoreError ──► SessionError ──► ErrorCode (UI)             │
//! │                                                                         │
//! │  SaveFailed keeps every in-memory edit and dirty flag: the user can    │
//! │  retry or discard.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use margin_core::{ChannelType, CoreError, ValidationError};
use margin_db::DbError;

// =============================================================================
// Store Error
// =============================================================================

/// Failure at the persistence boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The store refused the data (validation, constraint).
    #[error("Rejected by store: {0}")]
    Rejected(String),

    /// The store could not be reached or failed mid-operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { id, .. } => StoreError::ProductNotFound(id),
            DbError::Validation(e) => StoreError::Rejected(e.to_string()),
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                StoreError::Rejected(err.to_string())
            }
            other => {
                tracing::error!(error = %other, "Store operation failed");
                StoreError::Unavailable(other.to_string())
            }
        }
    }
}

// =============================================================================
// Session Error
// =============================================================================

/// Errors surfaced by the Channel Manager.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An edit was rejected; state is unchanged.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Channel not configured: {0}")]
    ChannelNotFound(ChannelType),

    #[error("Failed to load product {product_id}: {source}")]
    LoadFailed {
        product_id: String,
        #[source]
        source: StoreError,
    },

    /// Saving failed. Edits and dirty flags are preserved.
    #[error("Save failed: {0}")]
    SaveFailed(#[source] StoreError),

    #[error("No open session for product {0}")]
    NotOpen(String),
}

impl From<CoreError> for SessionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ChannelNotFound(t) => SessionError::ChannelNotFound(t),
            CoreError::Validation(e) => SessionError::Validation(e),
        }
    }
}

/// Machine-readable error codes for the editing UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Show next to the edited field.
    ValidationError,
    NotFound,
    /// Offer retry / discard.
    SaveFailed,
    Internal,
}

impl SessionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::Validation(_) => ErrorCode::ValidationError,
            SessionError::ChannelNotFound(_) | SessionError::NotOpen(_) => ErrorCode::NotFound,
            SessionError::LoadFailed {
                source: StoreError::ProductNotFound(_),
                ..
            } => ErrorCode::NotFound,
            SessionError::LoadFailed { .. } => ErrorCode::Internal,
            SessionError::SaveFailed(_) => ErrorCode::SaveFailed,
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
