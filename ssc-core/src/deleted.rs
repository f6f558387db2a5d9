use std::collections::HashSet;

use parking_lot::Mutex;
use serde_json::Value;

use crate::storage::StoreHandle;

pub const STORAGE_KEY: &str = "deleted_resources";

/// Set of identity keys marked deleted, persisted as an ordered list.
///
/// The list is read from the store on first use and kept in memory
/// afterwards; every mutation writes the whole list back.
pub struct DeletionRegistry {
    store: StoreHandle,
    keys: Mutex<Option<Vec<String>>>,
}

impl DeletionRegistry {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store,
            keys: Mutex::new(None),
        }
    }

    pub fn is_deleted(&self, key: &str) -> bool {
        self.with_keys(|keys| keys.iter().any(|k| k == key))
    }

    pub fn mark_deleted(&self, key: &str) {
        self.with_keys(|keys| {
            if keys.iter().any(|k| k == key) {
                return;
            }
            keys.push(key.to_owned());
            self.save(keys);
        })
    }

    pub fn mark_restored(&self, key: &str) {
        self.with_keys(|keys| {
            let Some(index) = keys.iter().position(|k| k == key) else {
                return;
            };
            keys.remove(index);
            self.save(keys);
        })
    }

    /// Deleted keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.with_keys(|keys| keys.clone())
    }

    fn with_keys<R>(&self, f: impl FnOnce(&mut Vec<String>) -> R) -> R {
        let mut guard = self.keys.lock();
        let keys = guard.get_or_insert_with(|| self.load());
        f(keys)
    }

    fn load(&self) -> Vec<String> {
        match self.store.get(STORAGE_KEY) {
            Ok(Some(value)) => match serde_json::from_value::<Vec<String>>(value) {
                Ok(mut keys) => {
                    let mut seen = HashSet::new();
                    keys.retain(|k| seen.insert(k.clone()));
                    keys
                }
                Err(err) => {
                    log::warn!("ignoring malformed {}: {}", STORAGE_KEY, err);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                log::warn!("failed to read {}: {}", STORAGE_KEY, err);
                Vec::new()
            }
        }
    }

    fn save(&self, keys: &[String]) {
        let value = Value::from(keys.to_vec());
        if let Err(err) = self.store.set(STORAGE_KEY, &value) {
            log::error!("failed to save {}: {}", STORAGE_KEY, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    #[test]
    fn delete_then_restore_round_trips() {
        let registry = DeletionRegistry::new(MemoryStore::handle());
        assert!(!registry.is_deleted("/a/b"));
        registry.mark_deleted("/a/b");
        assert!(registry.is_deleted("/a/b"));
        registry.mark_restored("/a/b");
        assert!(!registry.is_deleted("/a/b"));
    }

    #[test]
    fn duplicate_delete_keeps_one_entry() {
        let store = Arc::new(MemoryStore::new());
        let registry = DeletionRegistry::new(store.clone());
        registry.mark_deleted("/a/b");
        registry.mark_deleted("/a/b");
        assert_eq!(registry.keys(), vec!["/a/b".to_string()]);
        assert_eq!(store.get(STORAGE_KEY).unwrap(), Some(json!(["/a/b"])));
    }

    #[test]
    fn restore_of_unknown_key_does_not_write() {
        let store = Arc::new(MemoryStore::new());
        let registry = DeletionRegistry::new(store.clone());
        registry.mark_restored("/never/deleted");
        assert!(store.get_raw(STORAGE_KEY).is_none());
    }

    #[test]
    fn hydrates_from_store_once() {
        let store = Arc::new(MemoryStore::new());
        store.set(STORAGE_KEY, &json!(["/x/1", "/x/2"])).unwrap();
        let registry = DeletionRegistry::new(store.clone());
        assert!(registry.is_deleted("/x/2"));

        // Later writes behind the registry's back are not observed.
        store.set(STORAGE_KEY, &json!([])).unwrap();
        assert!(registry.is_deleted("/x/2"));
    }

    #[test]
    fn writes_through_in_insertion_order() {
        let store = Arc::new(MemoryStore::new());
        let registry = DeletionRegistry::new(store.clone());
        registry.mark_deleted("/b");
        registry.mark_deleted("/a");
        registry.mark_deleted("/c");
        registry.mark_restored("/a");
        assert_eq!(store.get(STORAGE_KEY).unwrap(), Some(json!(["/b", "/c"])));
    }

    #[test]
    fn corrupt_blob_reads_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set_raw(STORAGE_KEY, "[\"/a\", ");
        let registry = DeletionRegistry::new(store.clone());
        assert!(registry.keys().is_empty());

        store.set(STORAGE_KEY, &json!({"not": "a list"})).unwrap();
        let registry = DeletionRegistry::new(store);
        assert!(!registry.is_deleted("/a"));
    }

    #[test]
    fn duplicates_in_store_are_collapsed() {
        let store = Arc::new(MemoryStore::new());
        store.set(STORAGE_KEY, &json!(["/a", "/a", "/b"])).unwrap();
        let registry = DeletionRegistry::new(store);
        assert_eq!(registry.keys(), vec!["/a".to_string(), "/b".to_string()]);
    }
}
