//! redb-backed persistent store.
//!
//! One redb table per namespace. The database file is created on `open`
//! and released on `close`; `export` copies the file into the target
//! directory.

use crate::error::{StoreError, StoreResult};
use crate::storage::{valid_key, Storage};
use redb::{Database, ReadableTable, TableDefinition, TableError};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// A [`Storage`] backed by an embedded redb database.
pub struct RedbStore {
    path: PathBuf,
    db: RwLock<Option<Database>>,
}

impl RedbStore {
    /// Creates a store for the database file at `path`. The file is not
    /// touched until [`Storage::open`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            db: RwLock::new(None),
        }
    }

    fn with_db<T>(&self, op: &str, f: impl FnOnce(&Database) -> StoreResult<T>) -> StoreResult<T> {
        let guard = self
            .db
            .read()
            .map_err(|e| StoreError::storage(op, e.to_string()))?;
        let db = guard
            .as_ref()
            .ok_or_else(|| StoreError::storage(op, "store is not open"))?;
        f(db)
    }
}

fn table(namespace: &str) -> TableDefinition<'_, &'static [u8], &'static [u8]> {
    TableDefinition::new(namespace)
}

impl Storage for RedbStore {
    fn open(&self) -> StoreResult<()> {
        let mut guard = self
            .db
            .write()
            .map_err(|e| StoreError::storage("open", e.to_string()))?;
        if guard.is_none() {
            let db = Database::create(&self.path)
                .map_err(|e| StoreError::storage("open", e))?;
            *guard = Some(db);
        }
        Ok(())
    }

    fn close(&self) -> StoreResult<()> {
        let mut guard = self
            .db
            .write()
            .map_err(|e| StoreError::storage("close", e.to_string()))?;
        *guard = None;
        Ok(())
    }

    fn put(&self, namespace: &str, key: &[u8], value: &[u8]) -> StoreResult<()> {
        valid_key(namespace, key)?;
        self.with_db("put", |db| {
            let txn = db
                .begin_write()
                .map_err(|e| StoreError::storage("put", e))?;
            {
                let mut t = txn
                    .open_table(table(namespace))
                    .map_err(|e| StoreError::storage("put", e))?;
                t.insert(key, value)
                    .map_err(|e| StoreError::storage("put", e))?;
            }
            txn.commit().map_err(|e| StoreError::storage("put", e))
        })
    }

    fn get(&self, namespace: &str, key: &[u8]) -> StoreResult<Vec<u8>> {
        valid_key(namespace, key)?;
        self.with_db("get", |db| {
            let txn = db
                .begin_read()
                .map_err(|e| StoreError::storage("get", e))?;
            let t = match txn.open_table(table(namespace)) {
                Ok(t) => t,
                Err(TableError::TableDoesNotExist(_)) => return Err(StoreError::NotFound),
                Err(e) => return Err(StoreError::storage("get", e)),
            };
            let value = t
                .get(key)
                .map_err(|e| StoreError::storage("get", e))?
                .ok_or(StoreError::NotFound)?;
            Ok(value.value().to_vec())
        })
    }

    fn has(&self, namespace: &str, key: &[u8]) -> StoreResult<bool> {
        match self.get(namespace, key) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn delete(&self, namespace: &str, key: &[u8]) -> StoreResult<()> {
        valid_key(namespace, key)?;
        self.with_db("delete", |db| {
            let txn = db
                .begin_write()
                .map_err(|e| StoreError::storage("delete", e))?;
            {
                let mut t = txn
                    .open_table(table(namespace))
                    .map_err(|e| StoreError::storage("delete", e))?;
                t.remove(key)
                    .map_err(|e| StoreError::storage("delete", e))?;
            }
            txn.commit().map_err(|e| StoreError::storage("delete", e))
        })
    }

    fn list(&self, namespace: &str) -> StoreResult<Vec<Vec<u8>>> {
        self.with_db("list", |db| {
            let txn = db
                .begin_read()
                .map_err(|e| StoreError::storage("list", e))?;
            let t = match txn.open_table(table(namespace)) {
                Ok(t) => t,
                Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
                Err(e) => return Err(StoreError::storage("list", e)),
            };
            let mut keys = Vec::new();
            for entry in t.iter().map_err(|e| StoreError::storage("list", e))? {
                let (key, _) = entry.map_err(|e| StoreError::storage("list", e))?;
                keys.push(key.value().to_vec());
            }
            Ok(keys)
        })
    }

    fn export(&self, path: &Path) -> StoreResult<()> {
        std::fs::create_dir_all(path).map_err(|e| StoreError::storage("export", e))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StoreError::storage("export", "store path has no file name"))?;
        std::fs::copy(&self.path, path.join(file_name))
            .map_err(|e| StoreError::storage("export", e))?;
        Ok(())
    }
}
