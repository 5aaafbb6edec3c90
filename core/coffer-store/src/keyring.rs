//! Named key-material storage.
//!
//! A [`Keyring`] is a [`Coffer`] specialized for storing key material by
//! name: everything lives in one fixed namespace and overwrites are
//! always forbidden, so a key can never be silently replaced.

use crate::coffer::Coffer;
use crate::error::{StoreError, StoreResult};
use crate::options::CofferOptions;
use crate::storage::Storage;
use std::path::Path;
use std::sync::Arc;

const KEY_NAMESPACE: &str = "keys";

/// An encrypted store for named key material.
pub struct Keyring {
    coffer: Coffer,
}

impl Keyring {
    /// Builds a keyring over a backing storage. Overwrites are forced
    /// off regardless of the supplied options.
    pub fn new(store: Arc<dyn Storage>, opts: CofferOptions) -> StoreResult<Self> {
        let coffer = Coffer::new(store, opts.forbid_overwrites())?;
        Ok(Self { coffer })
    }

    pub fn open(&self) -> StoreResult<()> {
        self.coffer.open()
    }

    pub fn close(&self) -> StoreResult<()> {
        self.coffer.close()
    }

    /// Stores key material under a name. An existing name fails with
    /// [`StoreError::KeyExists`].
    pub fn put(&self, name: &str, key_material: &[u8]) -> StoreResult<()> {
        match self.coffer.put(KEY_NAMESPACE, name.as_bytes(), key_material) {
            Err(StoreError::Forbidden) => Err(StoreError::KeyExists),
            other => other,
        }
    }

    /// Retrieves the key material stored under a name.
    pub fn get(&self, name: &str) -> StoreResult<Vec<u8>> {
        self.coffer.get(KEY_NAMESPACE, name.as_bytes())
    }

    /// True if a key with the name exists.
    pub fn has(&self, name: &str) -> StoreResult<bool> {
        self.coffer.has(KEY_NAMESPACE, name.as_bytes())
    }

    /// Removes the key with the name.
    pub fn delete(&self, name: &str) -> StoreResult<()> {
        self.coffer.delete(KEY_NAMESPACE, name.as_bytes())
    }

    /// Lists the stored key names.
    pub fn list(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .coffer
            .list(KEY_NAMESPACE)?
            .into_iter()
            .map(|key| String::from_utf8_lossy(&key).into_owned())
            .collect())
    }

    /// Saves a copy of the keyring to the directory at `path`.
    pub fn export(&self, path: &Path) -> StoreResult<()> {
        self.coffer.export(path)
    }
}
