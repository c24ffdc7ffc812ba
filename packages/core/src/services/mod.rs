//! Business Services
//!
//! This module contains the note-level business logic:
//!
//! - `NotesService` - CRUD and title search with timestamp/identity rules
//! - `NotesCatalog` - cached note list patched after each mutation
//! - `SearchDebouncer` - collapses search keystroke bursts into one query
//!
//! Services sit between the storage traits in [`crate::db`] and the editor
//! session in [`crate::session`].

mod catalog;
mod debounce;
mod notes_service;

pub use catalog::NotesCatalog;
pub use debounce::SearchDebouncer;
pub use notes_service::NotesService;
