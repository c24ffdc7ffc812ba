//! Note Editor - one tab's editing session
//!
//! Wires the title field, the body [`DocumentEditor`], focus, the tab's
//! [`TabSession`], the [`CommandRegistry`] and the [`AutosaveController`].
//!
//! The body surface exists only after [`NoteEditor::mount`]; until then key
//! events aimed at it are inert.

use crate::config::AppConfig;
use crate::editor::{
    CommandRegistry, DispatchOutcome, DocumentEditor, EditorCommand, InputSurface, Key, KeyEvent,
};
use crate::models::{Note, NoteId};
use crate::services::NotesService;
use crate::session::autosave::{AutosaveController, SaveStatus};
use crate::session::binder::{SessionState, TabSession};
use crate::session::error::SessionError;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Title,
    Body,
}

pub struct NoteEditor {
    notes: NotesService,
    session: TabSession,
    autosave: AutosaveController,
    registry: CommandRegistry,
    title: String,
    body: Option<DocumentEditor>,
    focus: Focus,
    save_cooldown: Duration,
    last_save_shortcut: Option<Instant>,
}

impl NoteEditor {
    pub fn new(notes: NotesService, session: TabSession, config: &AppConfig) -> Self {
        Self {
            autosave: AutosaveController::with_display(notes.clone(), config.save_status_display),
            registry: CommandRegistry::new(config.ordered_lists),
            notes,
            session,
            title: String::new(),
            body: None,
            focus: Focus::Title,
            save_cooldown: config.save_shortcut_cooldown,
            last_save_shortcut: None,
        }
    }

    /// Mount the body surface and restore the tab's note
    ///
    /// A bound note that no longer exists is dropped from the session and
    /// the editor starts untitled.
    pub async fn mount(&mut self) -> Result<(), SessionError> {
        let state = self.session.mount().await?;

        let note = match state {
            SessionState::Bound(id) => {
                let note = self.notes.get_note_by_id(id).await?;
                if note.is_none() {
                    tracing::warn!("Tab bound to missing note {}, starting untitled", id);
                    self.session.unbind().await?;
                }
                note
            }
            SessionState::Unbound => None,
        };

        self.show(note.as_ref());
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.body.is_some()
    }

    /// Switch this tab to an existing note; `Ok(false)` when it does not exist
    pub async fn open_note(&mut self, id: NoteId) -> Result<bool, SessionError> {
        let Some(note) = self.notes.get_note_by_id(id).await? else {
            return Ok(false);
        };
        self.session.bind(id).await?;
        self.show(Some(&note));
        Ok(true)
    }

    /// Start a fresh untitled note in this tab
    pub async fn new_note(&mut self) -> Result<(), SessionError> {
        self.session.unbind().await?;
        self.show(None);
        Ok(())
    }

    /// Route one key event
    ///
    /// Intercepted session commands run here (save behind the shortcut
    /// cooldown, focus moves); on `Continue` the surface default runs.
    pub async fn handle_key(&mut self, surface: InputSurface, event: KeyEvent) -> DispatchOutcome {
        let outcome = self.registry.dispatch(surface, &event, self.body.as_mut());

        match outcome {
            DispatchOutcome::Intercepted(EditorCommand::Save) => self.save_from_shortcut().await,
            DispatchOutcome::Intercepted(EditorCommand::FocusBody) => self.focus_body(),
            DispatchOutcome::Intercepted(_) => {}
            DispatchOutcome::Continue => self.apply_default(surface, &event),
        }
        outcome
    }

    /// Save title and flattened body
    pub async fn save(&mut self) -> Result<Note, SessionError> {
        let content = self.content();
        self.autosave
            .save(&mut self.session, &self.title, &content)
            .await
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn body(&self) -> Option<&DocumentEditor> {
        self.body.as_ref()
    }

    pub fn body_mut(&mut self) -> Option<&mut DocumentEditor> {
        self.body.as_mut()
    }

    /// Flattened body text; empty while unmounted
    pub fn content(&self) -> String {
        self.body
            .as_ref()
            .map(DocumentEditor::text)
            .unwrap_or_default()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn session(&self) -> &TabSession {
        &self.session
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
        self.autosave.subscribe()
    }

    /// Feed text to the focused field one keystroke at a time
    pub async fn type_text(&mut self, text: &str) {
        let surface = match self.focus {
            Focus::Title => InputSurface::Title,
            Focus::Body => InputSurface::Body,
        };
        for ch in text.chars() {
            let event = match ch {
                '\n' => KeyEvent::new(Key::Enter),
                '\t' => KeyEvent::new(Key::Tab),
                ch => KeyEvent::char(ch),
            };
            self.handle_key(surface, event).await;
        }
    }

    async fn save_from_shortcut(&mut self) {
        if let Some(last) = self.last_save_shortcut {
            if last.elapsed() < self.save_cooldown {
                tracing::debug!("Save shortcut ignored during cooldown");
                return;
            }
        }
        self.last_save_shortcut = Some(Instant::now());

        // status already reflects the failure
        let _ = self.save().await;
    }

    fn focus_body(&mut self) {
        self.focus = Focus::Body;
        if let Some(body) = self.body.as_mut() {
            if body.selection().is_none() {
                body.caret_to_end();
            }
        }
    }

    fn apply_default(&mut self, surface: InputSurface, event: &KeyEvent) {
        if event.modifiers.primary() || event.modifiers.alt {
            return;
        }
        match surface {
            InputSurface::Title => match event.key {
                Key::Char(ch) => self.title.push(ch),
                Key::Backspace => {
                    self.title.pop();
                }
                _ => {}
            },
            InputSurface::Body => {
                let Some(body) = self.body.as_mut() else {
                    return;
                };
                match event.key {
                    Key::Char(ch) => {
                        body.insert_text(ch.encode_utf8(&mut [0; 4]));
                    }
                    Key::Enter => {
                        body.insert_paragraph();
                    }
                    Key::Backspace => {
                        body.delete_backward();
                    }
                    _ => {}
                }
            }
        }
    }

    fn show(&mut self, note: Option<&Note>) {
        let (title, content) = note
            .map(|note| (note.title.clone(), note.content.as_str()))
            .unwrap_or_default();
        let mut body = DocumentEditor::from_content(content);
        body.caret_to_end();

        self.title = title;
        self.body = Some(body);
        self.focus = Focus::Title;
    }
}
