//! Durable key-value storage for native hosts

use bridge_traits::{
    error::{BridgeError, Result},
    storage::KeyValueStore,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

fn poisoned<T>(_: T) -> BridgeError {
    BridgeError::OperationFailed("key-value store lock poisoned".to_string())
}

/// In-process key-value store.
///
/// Nothing survives the process; intended for tests and ephemeral hosts.
/// Keys are listed in sorted order.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `items`.
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: Mutex::new(
                items
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    fn items(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.items.lock().map_err(poisoned)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.items()?.keys().cloned().collect())
    }

    fn clear(&self, prefix: &str) -> Result<()> {
        self.items()?.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_overwrites() {
        let store = MemoryKeyValueStore::with_items([("credentials", "null")]);

        store.set_item("credentials", r#"{"token":"abc"}"#).unwrap();

        assert_eq!(
            store.get_item("credentials").unwrap().as_deref(),
            Some(r#"{"token":"abc"}"#)
        );
        assert!(store.get_item("classrooms").unwrap().is_none());
    }

    #[test]
    fn memory_store_remove_missing_key_is_ok() {
        let store = MemoryKeyValueStore::new();
        store.remove_item("missing").unwrap();
        assert!(!store.has_item("missing").unwrap());
    }

    #[test]
    fn memory_store_lists_and_clears_by_prefix() {
        let store = MemoryKeyValueStore::with_items([
            ("draft.b", "2"),
            ("credentials", "null"),
            ("draft.a", "1"),
        ]);

        assert_eq!(
            store.keys().unwrap(),
            vec!["credentials", "draft.a", "draft.b"]
        );

        store.clear("draft.").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["credentials"]);

        store.clear("").unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
