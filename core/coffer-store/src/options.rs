//! Store configuration.

use coffer_crypto::{AesEncryptor, Encryptor, KeyLen, Mode, Secret};
use coffer_encoding::{CompressionFormat, CompressorFn, DecompressorFn, EncodingResult};
use std::sync::Arc;

/// Options for a [`Coffer`](crate::Coffer).
///
/// An encryptor is required; everything else has defaults (no
/// compression, overwrites allowed). Validation happens when the store
/// is built.
#[derive(Clone)]
pub struct CofferOptions {
    pub(crate) encryptor: Option<Arc<dyn Encryptor>>,
    pub(crate) chain: Vec<Arc<dyn Encryptor>>,
    pub(crate) compression: CompressionFormat,
    pub(crate) compressor: Option<CompressorFn>,
    pub(crate) decompressor: Option<DecompressorFn>,
    pub(crate) overwrites: bool,
}

impl Default for CofferOptions {
    fn default() -> Self {
        Self {
            encryptor: None,
            chain: Vec::new(),
            compression: CompressionFormat::None,
            compressor: None,
            decompressor: None,
            overwrites: true,
        }
    }
}

impl CofferOptions {
    /// Options using the given encryptor.
    pub fn new(encryptor: Arc<dyn Encryptor>) -> Self {
        Self {
            encryptor: Some(encryptor),
            ..Self::default()
        }
    }

    /// Options using an AES encryptor with the given key length, mode,
    /// and secret.
    pub fn with_aes(key_len: KeyLen, mode: Mode, secret: Arc<dyn Secret>) -> Self {
        Self::new(Arc::new(AesEncryptor::new(key_len, mode, secret)))
    }

    /// Options using only an encryptor chain (no leading single
    /// encryptor).
    pub fn with_chain(encryptors: Vec<Arc<dyn Encryptor>>) -> Self {
        Self {
            chain: encryptors,
            ..Self::default()
        }
    }

    /// Appends encryptors to the chain. A single encryptor set through
    /// [`CofferOptions::new`] is prepended to the chain, making it the
    /// first encryption pass.
    pub fn with_encryptor_chain(mut self, encryptors: Vec<Arc<dyn Encryptor>>) -> Self {
        self.chain.extend(encryptors);
        self
    }

    /// Compresses data with a named format before encryption. Previously
    /// stored data, compressed or not, is read back transparently
    /// regardless of this setting.
    pub fn with_compression(mut self, format: CompressionFormat) -> Self {
        self.compression = format;
        self
    }

    /// Compresses and decompresses data with a caller-supplied codec
    /// pair. Implies the custom compression format.
    pub fn with_compressors(
        mut self,
        compressor: impl Fn(&[u8]) -> EncodingResult<Vec<u8>> + Send + Sync + 'static,
        decompressor: impl Fn(&[u8]) -> EncodingResult<Vec<u8>> + Send + Sync + 'static,
    ) -> Self {
        self.compression = CompressionFormat::Custom;
        self.compressor = Some(Arc::new(compressor));
        self.decompressor = Some(Arc::new(decompressor));
        self
    }

    /// Prevents the store from overwriting existing data: writes to an
    /// existing key fail with [`StoreError::Forbidden`].
    ///
    /// [`StoreError::Forbidden`]: crate::StoreError::Forbidden
    pub fn forbid_overwrites(mut self) -> Self {
        self.overwrites = false;
        self
    }

    /// True when overwrites are allowed.
    pub fn overwrites(&self) -> bool {
        self.overwrites
    }
}
