//! NoteStore Trait - Storage Engine Abstraction
//!
//! The storage engine contract for the `notes` collection: an async object
//! store with an auto-increment integer key and two secondary indexes
//! (`title`, `updated_at`).
//!
//! Domain rules (timestamp stamping, not-found semantics, search filtering)
//! belong to [`NotesService`](crate::services::NotesService); stores only
//! persist what they are given.
//!
//! # Examples
//!
//! ```rust,no_run
//! use swiftnote_core::db::{DatabaseHandle, LibsqlNoteStore, NoteIndex, NoteStore};
//! use swiftnote_core::models::NoteDraft;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let handle = Arc::new(DatabaseHandle::new("./data/notes.db"));
//! let store: Arc<dyn NoteStore> = Arc::new(LibsqlNoteStore::new(handle));
//!
//! let id = store.add(NoteDraft::new("Hello", "world")).await?;
//! let newest_last = store.get_all(Some(NoteIndex::UpdatedAt), None).await?;
//! assert!(newest_last.iter().any(|n| n.id == Some(id)));
//! # Ok(())
//! # }
//! ```

use crate::db::database::DatabaseHandle;
use crate::db::error::StorageError;
use crate::models::{Note, NoteDraft, NoteId};
use async_trait::async_trait;
use std::sync::Arc;

/// Secondary indexes of the notes collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteIndex {
    /// Non-unique index on `title`
    Title,
    /// Non-unique index on `updated_at`
    UpdatedAt,
}

/// Read-merge-write step executed inside the store's atomic transaction
pub type NoteMutation = Box<dyn FnOnce(Note) -> Note + Send>;

/// Storage engine for note records
///
/// Implementations must be `Send + Sync`; every method may fail with a
/// [`StorageError`] (engine unavailable, quota, rejected write).
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Insert a new record and return the key the engine assigned
    async fn add(&self, draft: NoteDraft) -> Result<NoteId, StorageError>;

    /// Direct key lookup; `Ok(None)` when the key is absent
    async fn get(&self, id: NoteId) -> Result<Option<Note>, StorageError>;

    /// Upsert a record; the key must already be present on the record
    async fn put(&self, note: Note) -> Result<(), StorageError>;

    /// Delete by key; deleting an absent key is not an error
    async fn delete(&self, id: NoteId) -> Result<(), StorageError>;

    /// Read every record, optionally through an index, capped at `limit`
    ///
    /// - `None`: natural (primary key) order
    /// - `Some(index)`: ascending by the indexed field, ties by key
    async fn get_all(
        &self,
        index: Option<NoteIndex>,
        limit: Option<usize>,
    ) -> Result<Vec<Note>, StorageError>;

    /// Atomic read-merge-write
    ///
    /// Reads `id`, applies `mutation` and writes the result back inside one
    /// read-write transaction. Returns `Ok(None)` without writing when the
    /// record does not exist.
    async fn update_with(
        &self,
        id: NoteId,
        mutation: NoteMutation,
    ) -> Result<Option<Note>, StorageError>;
}

const SELECT_COLUMNS: &str = "SELECT id, title, content, created_at, updated_at, tags FROM notes";

/// libsql-backed note store
#[derive(Debug, Clone)]
pub struct LibsqlNoteStore {
    handle: Arc<DatabaseHandle>,
}

impl LibsqlNoteStore {
    pub fn new(handle: Arc<DatabaseHandle>) -> Self {
        Self { handle }
    }

    async fn connection(&self) -> Result<libsql::Connection, StorageError> {
        self.handle.get().await?.connect_with_timeout().await
    }
}

fn encode_tags(tags: &Option<Vec<String>>) -> Result<Option<String>, StorageError> {
    tags.as_ref()
        .map(|tags| serde_json::to_string(tags).map_err(StorageError::from))
        .transpose()
}

fn decode_tags(value: libsql::Value) -> Result<Option<Vec<String>>, StorageError> {
    match value {
        libsql::Value::Null => Ok(None),
        libsql::Value::Text(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        other => Err(StorageError::serialization(format!(
            "Unexpected tags column value: {:?}",
            other
        ))),
    }
}

fn row_to_note(row: &libsql::Row) -> Result<Note, StorageError> {
    let id: i64 = row.get(0)?;
    Ok(Note {
        id: Some(NoteId::new(id)),
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
        tags: decode_tags(row.get_value(5)?)?,
    })
}

async fn collect_notes(mut rows: libsql::Rows) -> Result<Vec<Note>, StorageError> {
    let mut notes = Vec::new();
    while let Some(row) = rows
        .next()
        .await
        .map_err(|e| StorageError::query_failed(e.to_string()))?
    {
        notes.push(row_to_note(&row)?);
    }
    Ok(notes)
}

async fn select_by_id(conn: &libsql::Connection, id: NoteId) -> Result<Option<Note>, StorageError> {
    let mut rows = conn
        .query(&format!("{} WHERE id = ?", SELECT_COLUMNS), [id.get()])
        .await
        .map_err(|e| StorageError::query_failed(format!("Failed to get note {}: {}", id, e)))?;

    match rows
        .next()
        .await
        .map_err(|e| StorageError::query_failed(e.to_string()))?
    {
        Some(row) => Ok(Some(row_to_note(&row)?)),
        None => Ok(None),
    }
}

async fn write_note(conn: &libsql::Connection, note: &Note) -> Result<(), StorageError> {
    let id = note
        .id
        .ok_or_else(|| StorageError::write_failed("put requires a record with a key"))?;
    let tags = encode_tags(&note.tags)?;

    conn.execute(
        "INSERT INTO notes (id, title, content, created_at, updated_at, tags)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            content = excluded.content,
            created_at = excluded.created_at,
            updated_at = excluded.updated_at,
            tags = excluded.tags",
        (
            id.get(),
            note.title.as_str(),
            note.content.as_str(),
            note.created_at,
            note.updated_at,
            tags.as_deref(),
        ),
    )
    .await
    .map_err(|e| StorageError::write_failed(format!("Failed to put note {}: {}", id, e)))?;

    Ok(())
}

#[async_trait]
impl NoteStore for LibsqlNoteStore {
    async fn add(&self, draft: NoteDraft) -> Result<NoteId, StorageError> {
        let conn = self.connection().await?;
        let tags = encode_tags(&draft.tags)?;

        conn.execute(
            "INSERT INTO notes (title, content, created_at, updated_at, tags) VALUES (?, ?, ?, ?, ?)",
            (
                draft.title.as_str(),
                draft.content.as_str(),
                draft.created_at,
                draft.updated_at,
                tags.as_deref(),
            ),
        )
        .await
        .map_err(|e| StorageError::write_failed(format!("Failed to insert note: {}", e)))?;

        Ok(NoteId::new(conn.last_insert_rowid()))
    }

    async fn get(&self, id: NoteId) -> Result<Option<Note>, StorageError> {
        let conn = self.connection().await?;
        select_by_id(&conn, id).await
    }

    async fn put(&self, note: Note) -> Result<(), StorageError> {
        let conn = self.connection().await?;
        write_note(&conn, &note).await
    }

    async fn delete(&self, id: NoteId) -> Result<(), StorageError> {
        let conn = self.connection().await?;
        conn.execute("DELETE FROM notes WHERE id = ?", [id.get()])
            .await
            .map_err(|e| {
                StorageError::write_failed(format!("Failed to delete note {}: {}", id, e))
            })?;
        Ok(())
    }

    async fn get_all(
        &self,
        index: Option<NoteIndex>,
        limit: Option<usize>,
    ) -> Result<Vec<Note>, StorageError> {
        let conn = self.connection().await?;
        let order_by = match index {
            None => "id ASC",
            Some(NoteIndex::Title) => "title ASC, id ASC",
            Some(NoteIndex::UpdatedAt) => "updated_at ASC, id ASC",
        };
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map(|l| l as i64).unwrap_or(-1);

        let rows = conn
            .query(
                &format!("{} ORDER BY {} LIMIT ?", SELECT_COLUMNS, order_by),
                [limit],
            )
            .await
            .map_err(|e| StorageError::query_failed(format!("Failed to list notes: {}", e)))?;

        collect_notes(rows).await
    }

    async fn update_with(
        &self,
        id: NoteId,
        mutation: NoteMutation,
    ) -> Result<Option<Note>, StorageError> {
        let conn = self.connection().await?;

        conn.execute("BEGIN IMMEDIATE", ()).await.map_err(|e| {
            StorageError::write_failed(format!("Failed to begin transaction: {}", e))
        })?;

        let existing = match select_by_id(&conn, id).await {
            Ok(existing) => existing,
            Err(e) => {
                let _rollback = conn.execute("ROLLBACK", ()).await;
                return Err(e);
            }
        };

        let Some(existing) = existing else {
            let _rollback = conn.execute("ROLLBACK", ()).await;
            return Ok(None);
        };

        let mut merged = mutation(existing);
        merged.id = Some(id);
        if let Err(e) = write_note(&conn, &merged).await {
            let _rollback = conn.execute("ROLLBACK", ()).await;
            return Err(e);
        }

        if let Err(e) = conn.execute("COMMIT", ()).await {
            let _rollback = conn.execute("ROLLBACK", ()).await;
            return Err(StorageError::write_failed(format!(
                "Failed to commit transaction: {}",
                e
            )));
        }

        Ok(Some(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> LibsqlNoteStore {
        LibsqlNoteStore::new(Arc::new(DatabaseHandle::new(
            temp_dir.path().join("notes.db"),
        )))
    }

    fn draft(title: &str, updated_at: i64) -> NoteDraft {
        NoteDraft {
            title: title.to_string(),
            content: format!("{} body", title),
            created_at: updated_at,
            updated_at,
            tags: None,
        }
    }

    #[tokio::test]
    async fn test_add_assigns_increasing_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let first = store.add(draft("a", 1)).await.unwrap();
        let second = store.add(draft("b", 2)).await.unwrap();

        assert!(first.get() > 0);
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_keys_are_not_reused_after_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let first = store.add(draft("a", 1)).await.unwrap();
        store.delete(first).await.unwrap();
        let second = store.add(draft("b", 2)).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_get_round_trips_tags() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let mut with_tags = draft("tagged", 5);
        with_tags.tags = Some(vec!["work".to_string(), "ideas".to_string()]);
        let id = store.add(with_tags).await.unwrap();

        let note = store.get(id).await.unwrap().unwrap();
        assert_eq!(note.id, Some(id));
        assert_eq!(
            note.tags,
            Some(vec!["work".to_string(), "ideas".to_string()])
        );
        assert_eq!(store.get(NoteId::new(9_999)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_requires_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let mut note = draft("keyless", 1).into_note(NoteId::new(1));
        note.id = None;

        let err = store.put(note).await.unwrap_err();
        assert!(err.is_write_failure());
    }

    #[tokio::test]
    async fn test_get_all_index_orders() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store.add(draft("banana", 30)).await.unwrap();
        store.add(draft("apple", 10)).await.unwrap();
        store.add(draft("cherry", 20)).await.unwrap();

        let natural: Vec<String> = store
            .get_all(None, None)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(natural, vec!["banana", "apple", "cherry"]);

        let by_title: Vec<String> = store
            .get_all(Some(NoteIndex::Title), None)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(by_title, vec!["apple", "banana", "cherry"]);

        let by_updated: Vec<i64> = store
            .get_all(Some(NoteIndex::UpdatedAt), Some(2))
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.updated_at)
            .collect();
        assert_eq!(by_updated, vec![10, 20]);
    }

    #[tokio::test]
    async fn test_update_with_missing_record_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let result = store
            .update_with(
                NoteId::new(404),
                Box::new(|mut note| {
                    note.title = "never".to_string();
                    note
                }),
            )
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(store.get_all(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_with_merges_inside_transaction() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let id = store.add(draft("before", 1)).await.unwrap();

        let merged = store
            .update_with(
                id,
                Box::new(|mut note| {
                    note.title = "after".to_string();
                    note.updated_at = 99;
                    note
                }),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(merged.title, "after");
        let stored = store.get(id).await.unwrap().unwrap();
        assert_eq!(stored, merged);
    }

    #[tokio::test]
    async fn test_update_with_keeps_record_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let id = store.add(draft("target", 1)).await.unwrap();
        let other = store.add(draft("other", 2)).await.unwrap();

        let merged = store
            .update_with(
                id,
                Box::new(move |mut note| {
                    note.id = Some(other);
                    note.title = "moved".to_string();
                    note
                }),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(merged.id, Some(id));
        assert_eq!(store.get(id).await.unwrap().unwrap().title, "moved");
        assert_eq!(store.get(other).await.unwrap().unwrap().title, "other");
    }
}
