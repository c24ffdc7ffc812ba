//! Database Layer
//!
//! This module handles all persistence using embedded libsql:
//!
//! - Lazy, single-flight database initialization ([`DatabaseHandle`])
//! - The `notes` collection with its `title` and `updated_at` indexes
//! - The durable `kv_store` table used for tab/session bookkeeping
//! - In-memory engines with the same contracts for tests
//!
//! # Architecture
//!
//! Stores are reached through the [`NoteStore`] and [`KeyValueStore`] traits.
//! Services hold `Arc<dyn NoteStore>` / `Arc<dyn KeyValueStore>` and never
//! see libsql directly.

mod database;
mod error;
mod kv_store;
mod memory_store;
mod note_store;

pub use database::{DatabaseHandle, DatabaseService};
pub use error::StorageError;
pub use kv_store::{KeyValueStore, LibsqlKeyValueStore};
pub use memory_store::{MemoryKeyValueStore, MemoryNoteStore};
pub use note_store::{LibsqlNoteStore, NoteIndex, NoteMutation, NoteStore};
