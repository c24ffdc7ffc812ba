//! Search input debouncing
//!
//! Each keystroke replaces the pending timer; only the last query of a burst
//! is emitted, `delay` after it was typed.

use crate::config::AppConfig;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct SearchDebouncer {
    delay: Duration,
    sender: mpsc::UnboundedSender<String>,
    pending: Option<JoinHandle<()>>,
}

impl SearchDebouncer {
    /// Create a debouncer and the receiver that yields settled queries
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                sender,
                pending: None,
            },
            receiver,
        )
    }

    /// Debouncer using the configured search delay
    pub fn from_config(config: &AppConfig) -> (Self, mpsc::UnboundedReceiver<String>) {
        Self::new(config.search_debounce)
    }

    /// Record a keystroke; cancels whatever query was still waiting
    pub fn input(&mut self, query: impl Into<String>) {
        self.cancel();

        let query = query.into();
        let delay = self.delay;
        let sender = self.sender.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // receiver gone means nobody is searching anymore
            let _ = sender.send(query);
        }));
    }

    /// Drop the pending query, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
