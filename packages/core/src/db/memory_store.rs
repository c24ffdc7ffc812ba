//! In-memory storage engines
//!
//! Same contracts, key assignment and index ordering as the libsql stores,
//! without a file. Used by tests and throwaway sessions.

use crate::db::error::StorageError;
use crate::db::kv_store::KeyValueStore;
use crate::db::note_store::{NoteIndex, NoteMutation, NoteStore};
use crate::models::{Note, NoteDraft, NoteId};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct NoteTable {
    /// Last key handed out; keys are never reused
    last_id: i64,
    rows: BTreeMap<NoteId, Note>,
}

/// In-memory note store
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    table: Mutex<NoteTable>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, NoteTable>, StorageError> {
        self.table
            .lock()
            .map_err(|_| StorageError::unavailable("memory".into(), "note table lock poisoned"))
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn add(&self, draft: NoteDraft) -> Result<NoteId, StorageError> {
        let mut table = self.lock()?;
        table.last_id += 1;
        let id = NoteId::new(table.last_id);
        table.rows.insert(id, draft.into_note(id));
        Ok(id)
    }

    async fn get(&self, id: NoteId) -> Result<Option<Note>, StorageError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn put(&self, note: Note) -> Result<(), StorageError> {
        let id = note
            .id
            .ok_or_else(|| StorageError::write_failed("put requires a record with a key"))?;
        let mut table = self.lock()?;
        table.last_id = table.last_id.max(id.get());
        table.rows.insert(id, note);
        Ok(())
    }

    async fn delete(&self, id: NoteId) -> Result<(), StorageError> {
        self.lock()?.rows.remove(&id);
        Ok(())
    }

    async fn get_all(
        &self,
        index: Option<NoteIndex>,
        limit: Option<usize>,
    ) -> Result<Vec<Note>, StorageError> {
        // BTreeMap iteration is primary key order, so a stable sort keeps ties by key
        let mut notes: Vec<Note> = self.lock()?.rows.values().cloned().collect();
        match index {
            None => {}
            Some(NoteIndex::Title) => notes.sort_by(|a, b| a.title.cmp(&b.title)),
            Some(NoteIndex::UpdatedAt) => notes.sort_by_key(|n| n.updated_at),
        }
        if let Some(limit) = limit {
            notes.truncate(limit);
        }
        Ok(notes)
    }

    async fn update_with(
        &self,
        id: NoteId,
        mutation: NoteMutation,
    ) -> Result<Option<Note>, StorageError> {
        let mut table = self.lock()?;
        let Some(existing) = table.rows.get(&id).cloned() else {
            return Ok(None);
        };
        let mut merged = mutation(existing);
        merged.id = Some(id);
        table.rows.insert(id, merged.clone());
        Ok(Some(merged))
    }
}

/// In-memory durable key/value store
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::unavailable("memory".into(), "kv lock poisoned"))
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .lock()?
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }
}
