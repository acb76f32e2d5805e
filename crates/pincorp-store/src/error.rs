//! # Store Error Types
//!
//! Error types for state owner operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError / ValidationError (pincorp-core)                             │
//! │  io::Error, serde_json::Error (snapshots)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds entity context                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in console) ← Serialized for the operator                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed transaction never commits, so every error here leaves the
//! collections as they were.

use std::path::PathBuf;

use pincorp_core::{CoreError, ValidationError};
use thiserror::Error;

/// State owner errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in its collection.
    ///
    /// ## When This Occurs
    /// - Unknown id passed to get/update/delete
    /// - BOM deleted before an order was created from it
    /// - Product deleted while still in a cart
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A business rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Reading or writing the snapshot file failed.
    ///
    /// ## When This Occurs
    /// - Directory not writable
    /// - Disk full
    #[error("Snapshot I/O failed for {path}: {source}")]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot file is not valid JSON for this version.
    #[error("Snapshot format error: {0}")]
    SnapshotFormat(#[from] serde_json::Error),

    /// The snapshot was written by an unknown format version.
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedSnapshot { found: u32, expected: u32 },

    /// A writer panicked while holding the lock.
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a ConfirmationRequired error for a destructive action.
    pub fn confirmation_required(action: impl Into<String>) -> Self {
        StoreError::Core(CoreError::ConfirmationRequired {
            action: action.into(),
        })
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Core(CoreError::Validation(err))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
