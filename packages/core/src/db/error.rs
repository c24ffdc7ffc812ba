//! Storage Error Types
//!
//! Every engine-level rejection surfaces as a [`StorageError`]. "Not found"
//! is never an error here; lookups return `Option` and deletes return `bool`.

use std::path::PathBuf;
use thiserror::Error;

/// Storage engine errors
///
/// Two families matter to callers:
/// - *unavailable*: the engine could not be opened or initialized
/// - *write failed*: the engine was open but rejected a write
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database file
    #[error("Storage unavailable at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    /// Failed to create schema (tables or indexes)
    #[error("Failed to initialize storage schema: {0}")]
    InitializationFailed(String),

    /// Permission denied when accessing the database location
    #[error("Permission denied for storage path: {path}")]
    PermissionDenied { path: PathBuf },

    /// Failed to create parent directory
    #[error("Failed to create parent directory for storage: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    /// A write (insert, put, delete, transaction) was rejected
    #[error("Storage write failed: {context}")]
    WriteFailed { context: String },

    /// A read query was rejected
    #[error("Storage query failed: {context}")]
    QueryFailed { context: String },

    /// Stored value could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(String),

    /// libsql operation error
    #[error("Storage operation failed: {0}")]
    Libsql(#[from] libsql::Error),
}

impl StorageError {
    /// Create an unavailable error
    pub fn unavailable(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            path,
            reason: reason.into(),
        }
    }

    /// Create an initialization failed error
    pub fn initialization_failed(msg: impl Into<String>) -> Self {
        Self::InitializationFailed(msg.into())
    }

    /// Create a permission denied error
    pub fn permission_denied(path: PathBuf) -> Self {
        Self::PermissionDenied { path }
    }

    /// Create a write failed error with context
    pub fn write_failed(context: impl Into<String>) -> Self {
        Self::WriteFailed {
            context: context.into(),
        }
    }

    /// Create a query failed error with context
    pub fn query_failed(context: impl Into<String>) -> Self {
        Self::QueryFailed {
            context: context.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// True for the "engine could not be opened" family
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. }
                | Self::InitializationFailed(_)
                | Self::PermissionDenied { .. }
                | Self::DirectoryCreationFailed(_)
        )
    }

    /// True when an open engine rejected a write
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::WriteFailed { .. })
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
