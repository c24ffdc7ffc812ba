//! Editor Layer
//!
//! - [`document`] - tagged-union node tree (blocks, lists, text runs)
//! - [`bridge`] - hydrate persisted content into a tree and flatten it back
//! - [`DocumentEditor`] - the body editing surface and its mutations
//! - [`CommandRegistry`] - priority-ordered key bindings and dispatch
//! - [`keymap`] - key events, chords and the shortcut reference

pub mod bridge;
mod commands;
pub mod document;
mod inline;
pub mod keymap;
mod selection;
mod surface;

pub use commands::{
    Binding, CommandContext, CommandRegistry, DispatchOutcome, EditorCommand, InputSurface,
    SurfaceFilter,
};
pub use document::{
    Block, Document, HeadingLevel, LeafPath, List, ListItem, ListKind, TextFormat, TextRun,
};
pub use keymap::{shortcut_help, Chord, Key, KeyEvent, Modifiers, Platform, ShortcutHelp};
pub use selection::{Position, Selection};
pub use surface::{AppliedTransform, DocumentEditor};
