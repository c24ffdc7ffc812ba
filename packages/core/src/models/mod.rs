//! Data Models
//!
//! - `Note` - the persisted title/content record
//! - `NoteDraft` / `NoteUpdate` - create and sparse-update payloads
//! - `time` - clock abstraction shared by the repository and session layer

mod note;
pub mod time;

pub use note::{Note, NoteDraft, NoteId, NoteUpdate, ParseNoteIdError};
pub use time::{ManualTimeProvider, SystemTimeProvider, TimeProvider};
