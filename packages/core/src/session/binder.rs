//! Session Binder - tab to note association
//!
//! Every tab gets an identity `<creationMillis>-<suffix>` that is created once
//! and recalled from [`TabStorage`] for the rest of the tab's life. The note
//! open in the tab is persisted in the durable [`KeyValueStore`] under
//! `swiftnote:tab:<tabId>`, so each tab restores its own note after a reload
//! without touching other tabs.
//!
//! # Durable keys
//!
//! | Key | Value |
//! |---|---|
//! | `swiftnote:tab:<tabId>` | id of the note open in that tab |
//! | `current_note_id` | last note bound in any tab (hint only) |
//! | `last_tab_cleanup` | millis of the last stale-tab sweep |
//!
//! # Stale tabs
//!
//! Tabs that close never remove their association. [`TabSession::mount`]
//! sweeps associations whose embedded creation time is older than the
//! retention window, at most once per cleanup interval.

use crate::config::{CLEANUP_INTERVAL_DAYS, TAB_RETENTION_DAYS};
use crate::db::KeyValueStore;
use crate::models::{NoteId, TimeProvider};
use crate::session::error::SessionError;
use crate::session::tab_storage::TabStorage;
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// Tab-scoped key holding this tab's id
pub const TAB_ID_KEY: &str = "swiftnote_tab_id";

/// Namespace of durable tab associations
pub const TAB_KEY_PREFIX: &str = "swiftnote:tab:";

/// Durable global "last active note" pointer
pub const CURRENT_NOTE_KEY: &str = "current_note_id";

/// Durable timestamp of the last stale-tab sweep
pub const LAST_CLEANUP_KEY: &str = "last_tab_cleanup";

static TAB_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-([0-9a-z]+)$").unwrap());

/// Build a tab id from its creation time and a random suffix
pub fn generate_tab_id(created_millis: i64) -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(9)
        .collect();
    format!("{}-{}", created_millis, suffix)
}

/// Creation time embedded in a tab id
pub fn parse_tab_timestamp(tab_id: &str) -> Option<i64> {
    TAB_ID_PATTERN
        .captures(tab_id)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Durable key of a tab's association
pub fn tab_key(tab_id: &str) -> String {
    format!("{}{}", TAB_KEY_PREFIX, tab_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Fresh, never-saved note
    Unbound,
    /// Editing a persisted note
    Bound(NoteId),
}

/// One tab's editing session binding
pub struct TabSession {
    tab_id: String,
    durable: Arc<dyn KeyValueStore>,
    time: Arc<dyn TimeProvider>,
    retention: chrono::Duration,
    cleanup_interval: chrono::Duration,
    state: SessionState,
}

impl TabSession {
    /// Recall this tab's id from `tab_storage`, creating it on first load
    ///
    /// A corrupt stored id is replaced with a fresh one.
    pub fn new(
        tab_storage: &TabStorage,
        durable: Arc<dyn KeyValueStore>,
        time: Arc<dyn TimeProvider>,
    ) -> Self {
        let mut tab_id =
            tab_storage.get_or_insert_with(TAB_ID_KEY, || generate_tab_id(time.now_millis()));
        if parse_tab_timestamp(&tab_id).is_none() {
            tracing::warn!("Replacing malformed tab id {:?}", tab_id);
            tab_id = generate_tab_id(time.now_millis());
            tab_storage.set(TAB_ID_KEY, tab_id.clone());
        }

        Self::build(tab_id, durable, time)
    }

    /// Session for an explicit tab id
    pub fn with_tab_id(
        tab_id: impl Into<String>,
        durable: Arc<dyn KeyValueStore>,
        time: Arc<dyn TimeProvider>,
    ) -> Result<Self, SessionError> {
        let tab_id = tab_id.into();
        if parse_tab_timestamp(&tab_id).is_none() {
            return Err(SessionError::invalid_tab_id(tab_id));
        }
        Ok(Self::build(tab_id, durable, time))
    }

    fn build(tab_id: String, durable: Arc<dyn KeyValueStore>, time: Arc<dyn TimeProvider>) -> Self {
        Self {
            tab_id,
            durable,
            time,
            retention: chrono::Duration::days(TAB_RETENTION_DAYS),
            cleanup_interval: chrono::Duration::days(CLEANUP_INTERVAL_DAYS),
            state: SessionState::Unbound,
        }
    }

    /// Override the sweep policy
    pub fn with_policy(
        mut self,
        retention: chrono::Duration,
        cleanup_interval: chrono::Duration,
    ) -> Self {
        self.retention = retention;
        self.cleanup_interval = cleanup_interval;
        self
    }

    pub fn tab_id(&self) -> &str {
        &self.tab_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn bound_note(&self) -> Option<NoteId> {
        match self.state {
            SessionState::Bound(id) => Some(id),
            SessionState::Unbound => None,
        }
    }

    /// Sweep stale tabs, then restore this tab's association
    ///
    /// A failed sweep is logged and does not block the restore.
    pub async fn mount(&mut self) -> Result<SessionState, SessionError> {
        if let Err(e) = self.sweep_stale_tabs().await {
            tracing::warn!("Stale tab sweep failed: {}", e);
        }

        let stored = self.durable.get(&tab_key(&self.tab_id)).await?;
        self.state = match stored.as_deref().map(str::parse::<NoteId>) {
            Some(Ok(id)) => {
                tracing::debug!("Tab {} restored note {}", self.tab_id, id);
                SessionState::Bound(id)
            }
            Some(Err(e)) => {
                tracing::warn!("Ignoring association for tab {}: {}", self.tab_id, e);
                SessionState::Unbound
            }
            None => SessionState::Unbound,
        };
        Ok(self.state)
    }

    /// Bind this tab to `id` and update the global pointer
    ///
    /// The in-memory state changes even if persisting fails, so the next
    /// save still updates the same note.
    pub async fn bind(&mut self, id: NoteId) -> Result<(), SessionError> {
        self.state = SessionState::Bound(id);
        self.durable
            .set(&tab_key(&self.tab_id), &id.to_string())
            .await?;

        if let Err(e) = self.durable.set(CURRENT_NOTE_KEY, &id.to_string()).await {
            tracing::warn!("Failed to update last active note: {}", e);
        }

        tracing::debug!("Tab {} bound to note {}", self.tab_id, id);
        Ok(())
    }

    /// Forget this tab's note
    pub async fn unbind(&mut self) -> Result<(), SessionError> {
        self.state = SessionState::Unbound;
        self.durable.remove(&tab_key(&self.tab_id)).await?;
        tracing::debug!("Tab {} unbound", self.tab_id);
        Ok(())
    }

    /// Last note bound in any tab; a hint, never used to auto-bind
    pub async fn last_active_note(&self) -> Result<Option<NoteId>, SessionError> {
        Ok(self
            .durable
            .get(CURRENT_NOTE_KEY)
            .await?
            .and_then(|raw| raw.parse().ok()))
    }

    /// Remove associations older than the retention window
    ///
    /// Skipped when the previous sweep ran less than one cleanup interval
    /// ago. Keys whose timestamp cannot be parsed are left alone, as is this
    /// tab's own key. Returns the number of keys removed.
    pub async fn sweep_stale_tabs(&self) -> Result<usize, SessionError> {
        let now = self.time.now_millis();

        let last_cleanup = self
            .durable
            .get(LAST_CLEANUP_KEY)
            .await?
            .and_then(|raw| raw.parse::<i64>().ok());
        if let Some(last) = last_cleanup {
            if now - last < self.cleanup_interval.num_milliseconds() {
                tracing::trace!("Stale tab sweep skipped, last ran at {}", last);
                return Ok(0);
            }
        }

        let own_key = tab_key(&self.tab_id);
        let retention = self.retention.num_milliseconds();
        let mut removed = 0;

        for key in self.durable.keys_with_prefix(TAB_KEY_PREFIX).await? {
            if key == own_key {
                continue;
            }
            let Some(created) = parse_tab_timestamp(&key[TAB_KEY_PREFIX.len()..]) else {
                continue;
            };
            if now - created > retention {
                self.durable.remove(&key).await?;
                removed += 1;
            }
        }

        self.durable.set(LAST_CLEANUP_KEY, &now.to_string()).await?;

        if removed > 0 {
            tracing::info!("Removed {} stale tab associations", removed);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryKeyValueStore;
    use crate::models::ManualTimeProvider;

    #[test]
    fn test_tab_id_format() {
        let tab_id = generate_tab_id(1_700_000_000_000);
        let (millis, suffix) = tab_id.split_once('-').unwrap();

        assert_eq!(millis, "1700000000000");
        assert_eq!(suffix.len(), 9);
        assert_eq!(parse_tab_timestamp(&tab_id), Some(1_700_000_000_000));
    }

    #[test]
    fn test_parse_rejects_malformed_ids() {
        assert_eq!(parse_tab_timestamp("abc-def"), None);
        assert_eq!(parse_tab_timestamp("123"), None);
        assert_eq!(parse_tab_timestamp("123-"), None);
        assert_eq!(parse_tab_timestamp("123-ABC"), None);
    }

    #[test]
    fn test_tab_id_recalled_within_tab() {
        let storage = TabStorage::new();
        let durable: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let time: Arc<dyn TimeProvider> = Arc::new(ManualTimeProvider::from_millis(42));

        let first = TabSession::new(&storage, durable.clone(), time.clone());
        let reloaded = TabSession::new(&storage, durable, time);

        assert_eq!(first.tab_id(), reloaded.tab_id());
        assert!(first.tab_id().starts_with("42-"));
    }

    #[test]
    fn test_with_tab_id_validates() {
        let durable: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let time: Arc<dyn TimeProvider> = Arc::new(ManualTimeProvider::new());

        let err = TabSession::with_tab_id("not-a-tab!", durable, time)
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::InvalidTabId(_)));
    }

    #[tokio::test]
    async fn test_mount_ignores_non_positive_association() {
        let durable = Arc::new(MemoryKeyValueStore::new());
        let time: Arc<dyn TimeProvider> = Arc::new(ManualTimeProvider::from_millis(5));
        let mut session =
            TabSession::with_tab_id("5-abc", durable.clone(), time).unwrap();

        durable.set(&tab_key("5-abc"), "0").await.unwrap();
        assert_eq!(session.mount().await.unwrap(), SessionState::Unbound);

        durable.set(&tab_key("5-abc"), "12").await.unwrap();
        assert_eq!(
            session.mount().await.unwrap(),
            SessionState::Bound(NoteId::new(12))
        );
    }
}
