//! Notes Service - Repository Operations
//!
//! CRUD and search over a [`NoteStore`], enforcing the identity and timestamp
//! rules of the notes collection:
//!
//! - `created_at` is stamped once on insert and never changes
//! - `updated_at` is stamped on insert and on every successful update,
//!   always from the injected [`TimeProvider`], never from the caller
//! - a missing note is a soft result (`None` / `false`), never an error
//!
//! Storage failures propagate unchanged as [`StorageError`]; nothing is
//! retried here.

use crate::db::{NoteIndex, NoteStore, StorageError};
use crate::models::{Note, NoteDraft, NoteId, NoteUpdate, SystemTimeProvider, TimeProvider};
use std::sync::Arc;

/// Repository over the notes collection
#[derive(Clone)]
pub struct NotesService {
    store: Arc<dyn NoteStore>,
    time: Arc<dyn TimeProvider>,
}

impl NotesService {
    /// Create a service using the system clock
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self::with_time_provider(store, Arc::new(SystemTimeProvider))
    }

    /// Create a service with an explicit clock (tests use `ManualTimeProvider`)
    pub fn with_time_provider(store: Arc<dyn NoteStore>, time: Arc<dyn TimeProvider>) -> Self {
        Self { store, time }
    }

    pub fn time_provider(&self) -> Arc<dyn TimeProvider> {
        Arc::clone(&self.time)
    }

    /// Insert a new note
    ///
    /// Caller-supplied timestamps on the draft are ignored: both are set to
    /// the current time. Returns the persisted note with its assigned id.
    pub async fn create_note(&self, mut draft: NoteDraft) -> Result<Note, StorageError> {
        let now = self.time.now_millis();
        draft.created_at = now;
        draft.updated_at = now;

        let id = self.store.add(draft.clone()).await.map_err(|e| {
            tracing::error!("Failed to create note '{}': {}", draft.title, e);
            e
        })?;

        tracing::debug!("Created note {} '{}'", id, draft.title);
        Ok(draft.into_note(id))
    }

    /// Merge `update` over an existing note
    ///
    /// Returns `Ok(None)` without writing when `id` does not exist. The
    /// existence check and the write share one storage transaction.
    pub async fn update_note(
        &self,
        id: NoteId,
        update: NoteUpdate,
    ) -> Result<Option<Note>, StorageError> {
        let now = self.time.now_millis();

        let merged = self
            .store
            .update_with(
                id,
                Box::new(move |mut note: Note| {
                    note.apply_update(update);
                    note.updated_at = now.max(note.created_at);
                    note
                }),
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to update note {}: {}", id, e);
                e
            })?;

        match &merged {
            Some(_) => tracing::debug!("Updated note {}", id),
            None => tracing::debug!("Update skipped, note {} not found", id),
        }
        Ok(merged)
    }

    /// Delete a note; `Ok(false)` when it did not exist
    pub async fn delete_note(&self, id: NoteId) -> Result<bool, StorageError> {
        if self.store.get(id).await?.is_none() {
            tracing::debug!("Delete skipped, note {} not found", id);
            return Ok(false);
        }

        self.store.delete(id).await.map_err(|e| {
            tracing::error!("Failed to delete note {}: {}", id, e);
            e
        })?;

        tracing::debug!("Deleted note {}", id);
        Ok(true)
    }

    pub async fn get_note_by_id(&self, id: NoteId) -> Result<Option<Note>, StorageError> {
        self.store.get(id).await
    }

    /// List notes
    ///
    /// With `sort_by_updated` the result is newest-first (the `updated_at`
    /// index read ascending, then reversed); otherwise storage order. `limit`
    /// caps the index read itself, so a sorted, limited listing holds the
    /// least recently updated notes, still newest-first.
    pub async fn get_all_notes(
        &self,
        limit: Option<usize>,
        sort_by_updated: bool,
    ) -> Result<Vec<Note>, StorageError> {
        if !sort_by_updated {
            return self.store.get_all(None, limit).await;
        }

        let index = Some(NoteIndex::UpdatedAt);
        let mut notes = self.store.get_all(index, limit).await?;
        notes.reverse();
        Ok(notes)
    }

    /// Case-insensitive substring match on titles, in title order
    ///
    /// An empty query matches everything; callers that want "show all" for a
    /// blank search box should call [`get_all_notes`](Self::get_all_notes).
    pub async fn search_notes_by_title(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Note>, StorageError> {
        let needle = query.to_lowercase();
        let mut matches: Vec<Note> = self
            .store
            .get_all(Some(NoteIndex::Title), None)
            .await?
            .into_iter()
            .filter(|note| note.title.to_lowercase().contains(&needle))
            .collect();

        if let Some(limit) = limit {
            matches.truncate(limit);
        }

        tracing::debug!("Title search '{}' matched {} notes", query, matches.len());
        Ok(matches)
    }
}
