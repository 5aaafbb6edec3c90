//! The encrypted store façade.

use crate::error::{StoreError, StoreResult};
use crate::options::CofferOptions;
use crate::storage::{valid_key, Storage};
use crate::value::Keyed;
use coffer_crypto::{ChainEncryptor, Encryptor};
use coffer_encoding::{
    decode_format, encode_format, secure_marshal, secure_unmarshal, zstd_compress,
    zstd_decompress, CompressionFormat, CompressorFn, DecodeOptions, DecompressorFn, Describe,
    EncodeOptions,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// An encrypted key-value store.
///
/// Wraps a backing [`Storage`] with encryption, optional compression,
/// and structured record coding: `put`/`get` move raw bytes, `save`/
/// `load` move records through the secure coder, and `sparse` decodes
/// the cleartext projection of a record without touching the decryption
/// key.
pub struct Coffer {
    opts: CofferOptions,
    encryptor: Arc<dyn Encryptor>,
    store: Arc<dyn Storage>,
}

impl Coffer {
    /// Builds a store over a backing storage. Fails with
    /// [`StoreError::InvalidConfig`] when no encryptor is configured or
    /// custom compression is missing a codec.
    pub fn new(store: Arc<dyn Storage>, opts: CofferOptions) -> StoreResult<Self> {
        if opts.compression == CompressionFormat::Custom
            && (opts.compressor.is_none() || opts.decompressor.is_none())
        {
            return Err(StoreError::InvalidConfig(
                "custom compression requires a compressor and a decompressor".into(),
            ));
        }
        let mut encryptors = Vec::new();
        if let Some(encryptor) = &opts.encryptor {
            encryptors.push(encryptor.clone());
        }
        encryptors.extend(opts.chain.iter().cloned());
        let encryptor: Arc<dyn Encryptor> = match encryptors.len() {
            0 => {
                return Err(StoreError::InvalidConfig("encryptor is required".into()));
            }
            1 => encryptors.remove(0),
            _ => Arc::new(
                ChainEncryptor::new(encryptors)
                    .map_err(|e| StoreError::InvalidConfig(e.to_string()))?,
            ),
        };
        Ok(Self {
            opts,
            encryptor,
            store,
        })
    }

    /// Opens the backing store.
    pub fn open(&self) -> StoreResult<()> {
        self.store.open()?;
        info!(encryption = %self.encryptor.name(), "store open");
        if self.opts.compression != CompressionFormat::None {
            info!(format = %self.opts.compression, "compression active");
        }
        if !self.opts.overwrites {
            info!("overwrites are disabled");
        }
        Ok(())
    }

    /// Closes the backing store.
    pub fn close(&self) -> StoreResult<()> {
        self.store.close()?;
        info!("store closed");
        Ok(())
    }

    /// Encrypts the plaintext and stores it at key.
    pub fn put(&self, namespace: &str, key: &[u8], plaintext: &[u8]) -> StoreResult<()> {
        debug!(namespace, bytes = plaintext.len(), "put");
        // the store would catch an invalid key too, but encryption is
        // expensive, so check everything up front
        valid_key(namespace, key)?;
        if plaintext.is_empty() {
            return Err(StoreError::Cipher("put: plaintext cannot be empty".into()));
        }
        self.can_put(namespace, key)?;
        let data = self.compress("put", plaintext)?;
        let ciphertext = self
            .encryptor
            .encrypt(&data)
            .map_err(|e| StoreError::cipher("put", e))?;
        self.store.put(namespace, key, &ciphertext)
    }

    /// Decrypts the ciphertext at key and returns the plaintext.
    pub fn get(&self, namespace: &str, key: &[u8]) -> StoreResult<Vec<u8>> {
        debug!(namespace, "get");
        let ciphertext = self.store.get(namespace, key)?;
        let plaintext = self
            .encryptor
            .decrypt(&ciphertext)
            .map_err(|e| StoreError::cipher("get", e))?;
        // decompress detects the framing; unframed data passes through
        self.decompress("get", plaintext)
    }

    /// Encodes the record through the secure coder and stores the sealed
    /// envelope at key.
    pub fn save<T: Serialize + Describe>(
        &self,
        namespace: &str,
        key: &[u8],
        value: &T,
    ) -> StoreResult<()> {
        debug!(namespace, "save");
        valid_key(namespace, key)?;
        self.can_put(namespace, key)?;
        let sealed = secure_marshal(
            value,
            &T::schema(),
            |plaintext| self.encryptor.encrypt(plaintext),
            self.encode_options(),
        )
        .map_err(|e| StoreError::encoding("save", e))?;
        self.store.put(namespace, key, &sealed)
    }

    /// Loads and decrypts the record at key.
    pub fn load<T: DeserializeOwned>(&self, namespace: &str, key: &[u8]) -> StoreResult<T> {
        debug!(namespace, "load");
        self.load_record("load", namespace, key, false)
    }

    /// Loads the sparse projection of the record at key: secure fields
    /// come back as empty values and the decryption key is not used.
    /// Records saved without secure fields load fully, as with
    /// [`Coffer::load`].
    pub fn sparse<T: DeserializeOwned>(&self, namespace: &str, key: &[u8]) -> StoreResult<T> {
        debug!(namespace, "sparse");
        self.load_record("sparse", namespace, key, true)
    }

    /// Stores a keyed record under its own namespace and key.
    pub fn save_keyed<T: Keyed + Serialize + Describe>(&self, value: &T) -> StoreResult<()> {
        value.valid_key()?;
        self.save(&value.namespace(), &value.key(), value)
    }

    /// Loads a keyed record in place.
    pub fn load_keyed<T: Keyed + DeserializeOwned>(&self, value: &mut T) -> StoreResult<()> {
        value.valid_key()?;
        *value = self.load(&value.namespace(), &value.key())?;
        Ok(())
    }

    /// Loads the sparse projection of a keyed record in place.
    pub fn sparse_keyed<T: Keyed + DeserializeOwned>(&self, value: &mut T) -> StoreResult<()> {
        value.valid_key()?;
        *value = self.sparse(&value.namespace(), &value.key())?;
        Ok(())
    }

    /// True if the key exists.
    pub fn has(&self, namespace: &str, key: &[u8]) -> StoreResult<bool> {
        self.store.has(namespace, key)
    }

    /// Returns `Ok` if writing to key is allowed. With overwrites
    /// disabled an existing key is [`StoreError::Forbidden`].
    pub fn can_put(&self, namespace: &str, key: &[u8]) -> StoreResult<()> {
        valid_key(namespace, key)?;
        if self.opts.overwrites {
            return Ok(());
        }
        // a not-found from the backing store is the expected outcome
        // here and is deliberately swallowed
        if self.has(namespace, key).unwrap_or(false) {
            return Err(StoreError::Forbidden);
        }
        Ok(())
    }

    /// Removes a key.
    pub fn delete(&self, namespace: &str, key: &[u8]) -> StoreResult<()> {
        debug!(namespace, "delete");
        self.store.delete(namespace, key)
    }

    /// Lists the keys in a namespace.
    pub fn list(&self, namespace: &str) -> StoreResult<Vec<Vec<u8>>> {
        self.store.list(namespace)
    }

    /// Saves a copy of the store to the directory at `path`.
    pub fn export(&self, path: &Path) -> StoreResult<()> {
        debug!(path = %path.display(), "export");
        self.store.export(path)
    }

    fn load_record<T: DeserializeOwned>(
        &self,
        op: &str,
        namespace: &str,
        key: &[u8],
        sparse: bool,
    ) -> StoreResult<T> {
        valid_key(namespace, key)?;
        let sealed = self.store.get(namespace, key)?;
        let mut opts = self.decode_options();
        if sparse {
            opts = opts.sparse();
        }
        secure_unmarshal(
            &sealed,
            |ciphertext| self.encryptor.decrypt(ciphertext),
            opts,
        )
        .map_err(|e| StoreError::encoding(op, e))
    }

    fn encode_options(&self) -> EncodeOptions {
        match self.compressor_fn() {
            Some(compressor) => EncodeOptions::default().with_compressor_fn(compressor),
            None => EncodeOptions::default(),
        }
    }

    fn decode_options(&self) -> DecodeOptions {
        // the decompressor is always offered; the envelope's compressed
        // flag decides whether it runs
        match self.decompressor_fn(self.opts.compression) {
            Some(decompressor) => DecodeOptions::default().with_decompressor_fn(decompressor),
            None => DecodeOptions::default(),
        }
    }

    fn compressor_fn(&self) -> Option<CompressorFn> {
        match self.opts.compression {
            CompressionFormat::None => None,
            CompressionFormat::Zstd => Some(Arc::new(zstd_compress)),
            CompressionFormat::Custom => self.opts.compressor.clone(),
        }
    }

    fn decompressor_fn(&self, format: CompressionFormat) -> Option<DecompressorFn> {
        match format {
            CompressionFormat::None => Some(Arc::new(zstd_decompress)),
            CompressionFormat::Zstd => Some(Arc::new(zstd_decompress)),
            CompressionFormat::Custom => self.opts.decompressor.clone(),
        }
    }

    /// Compresses and frames data on the raw path when compression is
    /// configured.
    fn compress(&self, op: &str, data: &[u8]) -> StoreResult<Vec<u8>> {
        let Some(compressor) = self.compressor_fn() else {
            return Ok(data.to_vec());
        };
        let size = data.len();
        let compressed = compressor(data).map_err(|e| StoreError::encoding(op, e))?;
        debug!(
            from = size,
            to = compressed.len(),
            format = %self.opts.compression,
            "compressed"
        );
        Ok(encode_format(&compressed, self.opts.compression))
    }

    /// Reverses the raw-path framing. Data without the compression
    /// marker is returned as-is.
    fn decompress(&self, op: &str, data: Vec<u8>) -> StoreResult<Vec<u8>> {
        let (payload, format) = decode_format(&data);
        if format == CompressionFormat::None {
            return Ok(data);
        }
        let decompressor = self.decompressor_fn(format).ok_or_else(|| {
            StoreError::Compression(format!("{op}: {format} requires a decompressor"))
        })?;
        decompressor(payload).map_err(|e| StoreError::encoding(op, e))
    }
}
