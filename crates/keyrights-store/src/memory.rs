//! In-memory implementation of the EntityStore trait.
//!
//! Primarily for testing. A BTreeMap keeps souls sorted, so prefix scans
//! come back in the same lexicographic order as the SQLite backend.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use keyrights_core::Soul;

use crate::error::Result;
use crate::traits::EntityStore;

/// In-memory store. All data is lost on drop. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get(&self, soul: &Soul) -> Result<Option<String>> {
        Ok(self.read().get(soul.as_str()).cloned())
    }

    async fn put(&self, soul: &Soul, record: &str) -> Result<()> {
        self.write().insert(soul.as_str().to_owned(), record.to_owned());
        Ok(())
    }

    async fn delete(&self, soul: &Soul) -> Result<()> {
        self.write().remove(soul.as_str());
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &Soul) -> Result<Vec<(Soul, String)>> {
        let records = self.read();
        let matches = records
            .range(prefix.as_str().to_owned()..)
            .take_while(|(soul, _)| soul.starts_with(prefix.as_str()))
            .map(|(soul, record)| (Soul::from_raw(soul.clone()), record.clone()))
            .collect();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyrights_core::GrantKind;

    #[tokio::test]
    async fn put_get_delete_round_trip() {
        let store = MemoryStore::new();
        let soul = Soul::account("a1");

        assert_eq!(store.get(&soul).await.unwrap(), None);

        store.put(&soul, "{\"id\":\"a1\"}").await.unwrap();
        assert_eq!(
            store.get(&soul).await.unwrap().as_deref(),
            Some("{\"id\":\"a1\"}")
        );

        store.delete(&soul).await.unwrap();
        assert_eq!(store.get(&soul).await.unwrap(), None);

        // Deleting again is a no-op.
        store.delete(&soul).await.unwrap();
    }

    #[tokio::test]
    async fn put_replaces_the_full_record() {
        let store = MemoryStore::new();
        let soul = Soul::client("c1");
        store.put(&soul, "first").await.unwrap();
        store.put(&soul, "second").await.unwrap();
        assert_eq!(store.get(&soul).await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn scan_prefix_returns_grants_in_soul_order() {
        let store = MemoryStore::new();
        store
            .put(&Soul::grant("d1", GrantKind::Group, "g1"), "group-grant")
            .await
            .unwrap();
        store
            .put(&Soul::grant("d1", GrantKind::Account, "a2"), "account-grant")
            .await
            .unwrap();
        store.put(&Soul::document("d1"), "doc").await.unwrap();
        store
            .put(&Soul::grant("d2", GrantKind::Account, "a2"), "other-doc")
            .await
            .unwrap();

        let scanned = store
            .scan_prefix(&Soul::document_grants_prefix("d1"))
            .await
            .unwrap();
        let records: Vec<&str> = scanned.iter().map(|(_, r)| r.as_str()).collect();
        assert_eq!(records, vec!["account-grant", "group-grant"]);
    }
}
