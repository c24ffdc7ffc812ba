//! Tab-scoped storage
//!
//! Ephemeral key/value storage that lives exactly as long as one tab. Values
//! survive reloads of the tab (the same `TabStorage` is handed to the next
//! session) but are never visible to other tabs.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct TabStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl TabStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
    }

    /// Return the stored value, storing `init()` first if absent
    pub fn get_or_insert_with(&self, key: &str, init: impl FnOnce() -> String) -> String {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_insert_with(init)
            .clone()
    }

    /// Drop everything, as when the tab closes
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_insert_runs_init_once() {
        let storage = TabStorage::new();
        let first = storage.get_or_insert_with("tab", || "1-a".to_string());
        let second = storage.get_or_insert_with("tab", || "2-b".to_string());

        assert_eq!(first, "1-a");
        assert_eq!(second, "1-a");

        storage.clear();
        assert_eq!(storage.get("tab"), None);
    }
}
