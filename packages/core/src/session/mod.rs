//! Editing Session Layer
//!
//! - `TabSession` - binds a tab identity to the note open in it
//! - `TabStorage` - tab-scoped storage holding the tab identity
//! - `AutosaveController` - runs saves and publishes save status
//! - `NoteEditor` - title field, body surface and dispatcher wired together

mod autosave;
mod binder;
mod error;
mod note_editor;
mod tab_storage;

pub use autosave::{AutosaveController, SaveStatus, UNTITLED_NOTE};
pub use binder::{
    generate_tab_id, parse_tab_timestamp, tab_key, SessionState, TabSession, CURRENT_NOTE_KEY,
    LAST_CLEANUP_KEY, TAB_ID_KEY, TAB_KEY_PREFIX,
};
pub use error::SessionError;
pub use note_editor::{Focus, NoteEditor};
pub use tab_storage::TabStorage;
