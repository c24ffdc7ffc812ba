//! Note Data Structures
//!
//! A [`Note`] is the only persisted entity. Its `content` is the flattened
//! plain-text form of the editor document (one line per block); structure and
//! inline marks live only in the in-memory editing session.
//!
//! # Examples
//!
//! ```rust
//! use swiftnote_core::models::{NoteDraft, NoteUpdate};
//!
//! let draft = NoteDraft::new("Groceries", "milk\neggs");
//! assert_eq!(draft.title, "Groceries");
//!
//! let update = NoteUpdate {
//!     title: Some("Weekly groceries".to_string()),
//!     ..Default::default()
//! };
//! assert!(update.content.is_none());
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Storage-assigned note identifier (auto-increment, never reused)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NoteId(i64);

impl NoteId {
    /// Wrap a raw key. Keys handed out by the storage engine are always positive.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw integer key
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a persisted id string is not a positive integer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid note id: {0:?}")]
pub struct ParseNoteIdError(pub String);

impl FromStr for NoteId {
    type Err = ParseNoteIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(raw) if raw > 0 => Ok(Self(raw)),
            _ => Err(ParseNoteIdError(s.to_string())),
        }
    }
}

/// Persisted note record
///
/// Serialized shape: `{ id?, title, content, createdAt, updatedAt, tags? }`.
///
/// Invariants:
/// - `updated_at >= created_at`
/// - `id` is `None` only for notes that were never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NoteId>,

    pub title: String,

    pub content: String,

    /// Milliseconds since epoch; set once at creation
    pub created_at: i64,

    /// Milliseconds since epoch; refreshed on every successful update
    pub updated_at: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Note {
    /// Apply a sparse update in place (timestamps are the caller's business)
    pub fn apply_update(&mut self, update: NoteUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
    }
}

/// A note that has not been persisted yet
///
/// Caller-supplied timestamps are accepted for shape compatibility but the
/// repository always overwrites them on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Turn the draft into a persisted note with the given id
    pub fn into_note(self, id: NoteId) -> Note {
        Note {
            id: Some(id),
            title: self.title,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
            tags: self.tags,
        }
    }
}

/// Sparse note update
///
/// `id`, `createdAt` and `updatedAt` are deliberately absent: the first two
/// never change and the last is always stamped by the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Uses double-Option pattern:
    /// - `None`: Don't change tags
    /// - `Some(None)`: Clear tags
    /// - `Some(Some(tags))`: Replace tags
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub tags: Option<Option<Vec<String>>>,
}

impl NoteUpdate {
    /// Update that replaces title and content, the shape used by saves
    pub fn title_and_content(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            tags: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }
}

/// Distinguishes an explicit `null` from an absent field
fn deserialize_optional_field<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_note_id_parses_positive_integers_only() {
        assert_eq!("42".parse::<NoteId>(), Ok(NoteId::new(42)));
        assert_eq!(" 7 ".parse::<NoteId>(), Ok(NoteId::new(7)));
        assert!("0".parse::<NoteId>().is_err());
        assert!("-3".parse::<NoteId>().is_err());
        assert!("abc".parse::<NoteId>().is_err());
        assert!("".parse::<NoteId>().is_err());
    }

    #[test]
    fn test_note_serializes_with_camel_case_record_shape() {
        let note = Note {
            id: Some(NoteId::new(3)),
            title: "A".to_string(),
            content: "line1\nline2".to_string(),
            created_at: 10,
            updated_at: 20,
            tags: None,
        };

        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 3,
                "title": "A",
                "content": "line1\nline2",
                "createdAt": 10,
                "updatedAt": 20
            })
        );
    }

    #[test]
    fn test_update_distinguishes_null_tags_from_missing_tags() {
        let missing: NoteUpdate = serde_json::from_value(json!({ "title": "x" })).unwrap();
        assert_eq!(missing.tags, None);

        let cleared: NoteUpdate = serde_json::from_value(json!({ "tags": null })).unwrap();
        assert_eq!(cleared.tags, Some(None));

        let replaced: NoteUpdate = serde_json::from_value(json!({ "tags": ["a"] })).unwrap();
        assert_eq!(replaced.tags, Some(Some(vec!["a".to_string()])));
    }

    #[test]
    fn test_apply_update_only_touches_provided_fields() {
        let mut note = NoteDraft::new("Title", "Body").into_note(NoteId::new(1));
        note.tags = Some(vec!["work".to_string()]);

        note.apply_update(NoteUpdate {
            content: Some("New body".to_string()),
            ..Default::default()
        });

        assert_eq!(note.title, "Title");
        assert_eq!(note.content, "New body");
        assert_eq!(note.tags, Some(vec!["work".to_string()]));
    }
}
