//! Autosave/Status Controller
//!
//! Runs saves for a [`TabSession`] and publishes a [`SaveStatus`] over a
//! `watch` channel:
//!
//! ```text
//! Idle ──save()──▶ Saving ──ok──▶ Saved ──2s──▶ Idle
//!                        └─err──▶ Error ──2s──▶ Idle
//! ```
//!
//! The reset to Idle is a spawned task that is aborted when another save
//! starts first. Overlapping saves are not serialized here.

use crate::config::SAVE_STATUS_DISPLAY;
use crate::models::{Note, NoteDraft, NoteUpdate};
use crate::services::NotesService;
use crate::session::binder::{SessionState, TabSession};
use crate::session::error::SessionError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Title used when the title field is blank
pub const UNTITLED_NOTE: &str = "Untitled Note";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    Error,
}

pub struct AutosaveController {
    notes: NotesService,
    status: Arc<watch::Sender<SaveStatus>>,
    display: Duration,
    reset_task: Option<JoinHandle<()>>,
}

impl AutosaveController {
    pub fn new(notes: NotesService) -> Self {
        Self::with_display(notes, SAVE_STATUS_DISPLAY)
    }

    /// Controller whose Saved/Error states last `display`
    pub fn with_display(notes: NotesService, display: Duration) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            notes,
            status: Arc::new(status),
            display,
            reset_task: None,
        }
    }

    pub fn status(&self) -> SaveStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    /// Persist `title` and `content` for the session's note
    ///
    /// Bound sessions update their note; unbound sessions create one and bind
    /// to it. A bound note that has disappeared is recreated and rebound.
    /// Failures end in [`SaveStatus::Error`] and are also returned.
    pub async fn save(
        &mut self,
        session: &mut TabSession,
        title: &str,
        content: &str,
    ) -> Result<Note, SessionError> {
        if let Some(task) = self.reset_task.take() {
            task.abort();
        }
        self.status.send_replace(SaveStatus::Saving);

        let title = if title.trim().is_empty() {
            UNTITLED_NOTE
        } else {
            title
        };

        let result = self.persist(session, title, content).await;
        let terminal = match &result {
            Ok(note) => {
                tracing::info!("Saved note {:?} '{}'", note.id, note.title);
                SaveStatus::Saved
            }
            Err(e) => {
                tracing::error!("Save failed: {}", e);
                SaveStatus::Error
            }
        };
        self.status.send_replace(terminal);
        self.schedule_reset();

        result
    }

    async fn persist(
        &self,
        session: &mut TabSession,
        title: &str,
        content: &str,
    ) -> Result<Note, SessionError> {
        if let SessionState::Bound(id) = session.state() {
            let update = NoteUpdate::title_and_content(title, content);
            if let Some(note) = self.notes.update_note(id, update).await? {
                return Ok(note);
            }
            tracing::warn!("Bound note {} no longer exists, creating a new one", id);
        }

        let note = self
            .notes
            .create_note(NoteDraft::new(title, content))
            .await?;
        if let Some(id) = note.id {
            session.bind(id).await?;
        }
        Ok(note)
    }

    fn schedule_reset(&mut self) {
        let status = Arc::clone(&self.status);
        let display = self.display;
        self.reset_task = Some(tokio::spawn(async move {
            tokio::time::sleep(display).await;
            status.send_if_modified(|current| {
                if matches!(current, SaveStatus::Saved | SaveStatus::Error) {
                    *current = SaveStatus::Idle;
                    true
                } else {
                    false
                }
            });
        }));
    }
}

impl Drop for AutosaveController {
    fn drop(&mut self) {
        if let Some(task) = self.reset_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{KeyValueStore, MemoryKeyValueStore, MemoryNoteStore};
    use crate::models::{ManualTimeProvider, NoteId, TimeProvider};
    use crate::session::TabStorage;

    fn setup() -> (AutosaveController, TabSession) {
        let notes = NotesService::new(Arc::new(MemoryNoteStore::new()));
        let durable: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let time: Arc<dyn TimeProvider> = Arc::new(ManualTimeProvider::from_millis(1_000));
        let session = TabSession::new(&TabStorage::new(), durable, time);
        (AutosaveController::new(notes), session)
    }

    #[tokio::test]
    async fn test_whitespace_title_saves_as_untitled() {
        let (mut autosave, mut session) = setup();

        let note = autosave.save(&mut session, "   ", "body").await.unwrap();

        assert_eq!(note.title, UNTITLED_NOTE);
        assert_eq!(session.bound_note(), note.id);
        assert_eq!(autosave.status(), SaveStatus::Saved);
    }

    #[tokio::test]
    async fn test_bound_session_updates_in_place() {
        let (mut autosave, mut session) = setup();
        let first = autosave.save(&mut session, "one", "").await.unwrap();
        let second = autosave.save(&mut session, "two", "text").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.id, Some(NoteId::new(1)));
        assert_eq!(second.content, "text");
    }

    #[tokio::test]
    async fn test_subscribers_see_saving_then_saved() {
        let (mut autosave, mut session) = setup();
        let mut status = autosave.subscribe();
        assert_eq!(*status.borrow_and_update(), SaveStatus::Idle);

        autosave.save(&mut session, "t", "").await.unwrap();

        assert!(status.has_changed().unwrap());
        assert_eq!(*status.borrow_and_update(), SaveStatus::Saved);
    }
}
