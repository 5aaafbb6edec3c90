//! In-memory backing store.

use crate::error::{StoreError, StoreResult};
use crate::storage::{valid_key, Storage};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::RwLock;

const EXPORT_FILE: &str = "memory-store.json";

type Namespaces = HashMap<String, BTreeMap<Vec<u8>, Vec<u8>>>;

/// A [`Storage`] held entirely in memory. Useful for tests and ephemeral
/// stores; `export` writes a hex-encoded JSON snapshot.
#[derive(Default)]
pub struct MemoryStore {
    namespaces: RwLock<Namespaces>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Namespaces>> {
        self.namespaces
            .read()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Namespaces>> {
        self.namespaces
            .write()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

impl Storage for MemoryStore {
    fn open(&self) -> StoreResult<()> {
        Ok(())
    }

    fn close(&self) -> StoreResult<()> {
        Ok(())
    }

    fn put(&self, namespace: &str, key: &[u8], value: &[u8]) -> StoreResult<()> {
        valid_key(namespace, key)?;
        self.write()?
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, namespace: &str, key: &[u8]) -> StoreResult<Vec<u8>> {
        valid_key(namespace, key)?;
        self.read()?
            .get(namespace)
            .and_then(|table| table.get(key))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn has(&self, namespace: &str, key: &[u8]) -> StoreResult<bool> {
        valid_key(namespace, key)?;
        Ok(self
            .read()?
            .get(namespace)
            .is_some_and(|table| table.contains_key(key)))
    }

    fn delete(&self, namespace: &str, key: &[u8]) -> StoreResult<()> {
        valid_key(namespace, key)?;
        if let Some(table) = self.write()?.get_mut(namespace) {
            table.remove(key);
        }
        Ok(())
    }

    fn list(&self, namespace: &str) -> StoreResult<Vec<Vec<u8>>> {
        Ok(self
            .read()?
            .get(namespace)
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn export(&self, path: &Path) -> StoreResult<()> {
        std::fs::create_dir_all(path).map_err(|e| StoreError::Storage(e.to_string()))?;
        let namespaces = self.read()?;
        let mut snapshot = serde_json::Map::new();
        for (namespace, table) in namespaces.iter() {
            let entries: serde_json::Map<String, serde_json::Value> = table
                .iter()
                .map(|(k, v)| (hex::encode(k), serde_json::Value::String(hex::encode(v))))
                .collect();
            snapshot.insert(namespace.clone(), serde_json::Value::Object(entries));
        }
        let data = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        std::fs::write(path.join(EXPORT_FILE), data)
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_roundtrip() {
        let store = MemoryStore::new();
        store.put("ns", b"k", b"v").unwrap();
        assert_eq!(store.get("ns", b"k").unwrap(), b"v");
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.get("ns", b"k"), Err(StoreError::NotFound)));
    }

    #[test]
    fn namespaces_are_isolated() {
        let store = MemoryStore::new();
        store.put("a", b"k", b"1").unwrap();
        store.put("b", b"k", b"2").unwrap();
        assert_eq!(store.get("a", b"k").unwrap(), b"1");
        assert_eq!(store.get("b", b"k").unwrap(), b"2");
    }

    #[test]
    fn delete_is_idempotent() {
        let store = MemoryStore::new();
        store.put("ns", b"k", b"v").unwrap();
        store.delete("ns", b"k").unwrap();
        store.delete("ns", b"k").unwrap();
        assert!(!store.has("ns", b"k").unwrap());
    }

    #[test]
    fn list_returns_all_keys() {
        let store = MemoryStore::new();
        store.put("ns", b"a", b"1").unwrap();
        store.put("ns", b"b", b"2").unwrap();
        let keys = store.list("ns").unwrap();
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec()]);
    }
}
