//! SwiftNote Core - Local-First Note Editor
//!
//! This crate provides storage, note management, editing sessions and the
//! structural editor command layer for the SwiftNote note editor.
//!
//! # Architecture
//!
//! - **Embedded libsql**: one `notes` collection with `title` / `updated_at`
//!   indexes plus a durable key/value table, opened lazily through a shared handle
//! - **Per-tab sessions**: each tab binds to its own note so concurrent tabs
//!   do not clobber each other
//! - **Lossy persistence**: the structured document lives in memory; storage
//!   keeps flattened plain text
//!
//! # Modules
//!
//! - [`models`] - Note records and the clock abstraction
//! - [`db`] - Storage engines (libsql and in-memory)
//! - [`services`] - Notes repository, catalog and search debouncing
//! - [`editor`] - Document tree, editing surface and command dispatch
//! - [`session`] - Tab binding, autosave and the note editor
//! - [`config`] / [`preferences`] - Runtime config and persisted preferences

pub mod config;
pub mod db;
pub mod editor;
pub mod models;
pub mod preferences;
pub mod services;
pub mod session;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DatabaseHandle, StorageError};
pub use models::*;
pub use services::*;
pub use session::{NoteEditor, SaveStatus, SessionError, TabSession, TabStorage};
