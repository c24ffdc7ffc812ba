//! Session Error Types

use crate::db::StorageError;
use thiserror::Error;

/// Errors surfaced by the tab session, autosave and note editor
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A tab id that is not `<millis>-<suffix>`
    #[error("Invalid tab id: {0:?}")]
    InvalidTabId(String),
}

impl SessionError {
    pub fn invalid_tab_id(tab_id: impl Into<String>) -> Self {
        Self::InvalidTabId(tab_id.into())
    }
}
