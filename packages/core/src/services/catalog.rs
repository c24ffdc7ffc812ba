//! Notes Catalog
//!
//! The list of notes shown next to the editor, kept in step with the
//! repository. Mutations go through [`NotesService`] and patch the cached
//! list in place instead of reloading it.

use crate::db::StorageError;
use crate::models::{Note, NoteDraft, NoteId, NoteUpdate};
use crate::services::NotesService;

/// Cached, searchable view over the notes collection
pub struct NotesCatalog {
    service: NotesService,
    notes: Vec<Note>,
    selected: Option<Note>,
    loading: bool,
    last_error: Option<String>,
}

impl NotesCatalog {
    pub fn new(service: NotesService) -> Self {
        Self {
            service,
            notes: Vec::new(),
            selected: None,
            loading: false,
            last_error: None,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected(&self) -> Option<&Note> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn select(&mut self, note: Option<Note>) {
        self.selected = note;
    }

    /// Reload every note, newest first
    pub async fn refresh(&mut self) -> Result<(), StorageError> {
        self.loading = true;
        let result = self.service.get_all_notes(None, true).await;
        self.loading = false;
        self.notes = self.record(result)?;
        Ok(())
    }

    /// Filter by title; a blank query shows everything
    pub async fn search(&mut self, query: &str) -> Result<(), StorageError> {
        if query.trim().is_empty() {
            return self.refresh().await;
        }

        self.loading = true;
        let result = self.service.search_notes_by_title(query, None).await;
        self.loading = false;
        self.notes = self.record(result)?;
        Ok(())
    }

    /// Create a note and put it at the top of the list
    pub async fn create(&mut self, draft: NoteDraft) -> Result<Note, StorageError> {
        let result = self.service.create_note(draft).await;
        let note = self.record(result)?;
        self.notes.insert(0, note.clone());
        Ok(note)
    }

    /// Update a note and replace its cached copy (and the selection if it matches)
    pub async fn update(
        &mut self,
        id: NoteId,
        update: NoteUpdate,
    ) -> Result<Option<Note>, StorageError> {
        let result = self.service.update_note(id, update).await;
        let Some(updated) = self.record(result)? else {
            return Ok(None);
        };

        if let Some(slot) = self.notes.iter_mut().find(|n| n.id == Some(id)) {
            *slot = updated.clone();
        }
        if self.selected.as_ref().and_then(|n| n.id) == Some(id) {
            self.selected = Some(updated.clone());
        }
        Ok(Some(updated))
    }

    /// Delete a note and drop it from the list (and the selection)
    pub async fn delete(&mut self, id: NoteId) -> Result<bool, StorageError> {
        let result = self.service.delete_note(id).await;
        let deleted = self.record(result)?;

        if deleted {
            self.notes.retain(|n| n.id != Some(id));
            if self.selected.as_ref().and_then(|n| n.id) == Some(id) {
                self.selected = None;
            }
        }
        Ok(deleted)
    }

    fn record<T>(&mut self, result: Result<T, StorageError>) -> Result<T, StorageError> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(e) => {
                tracing::warn!("Notes catalog operation failed: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
