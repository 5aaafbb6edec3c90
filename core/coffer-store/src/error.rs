use coffer_crypto::CryptoError;
use coffer_encoding::EncodingError;
use thiserror::Error;

/// Errors from the store façade.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store was built with an unusable configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Empty namespace or empty key.
    #[error("invalid storage key")]
    InvalidKey,

    /// Overwrites are disabled and the key exists.
    #[error("forbidden")]
    Forbidden,

    /// A named key already exists in the keyring.
    #[error("key already exists")]
    KeyExists,

    /// The backing store reported an absent key.
    #[error("not found")]
    NotFound,

    /// An encryptor or decryptor failed.
    #[error("cipher failure: {0}")]
    Cipher(String),

    /// A compression codec failed, or compressed data was met without a
    /// configured decompressor.
    #[error("compression failure: {0}")]
    Compression(String),

    /// Envelope validation or record coding failed.
    #[error("encoding failure: {0}")]
    Encoding(String),

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Wraps a cipher-layer error with the operation that hit it.
    pub(crate) fn cipher(op: &str, err: CryptoError) -> StoreError {
        StoreError::Cipher(format!("{op}: {err}"))
    }

    /// Wraps an encoding-layer error with the operation that hit it,
    /// preserving the error kind across the boundary.
    pub(crate) fn encoding(op: &str, err: EncodingError) -> StoreError {
        match err {
            EncodingError::Cipher(e) => StoreError::Cipher(format!("{op}: {e}")),
            EncodingError::Compression(e) => StoreError::Compression(format!("{op}: {e}")),
            other => StoreError::Encoding(format!("{op}: {other}")),
        }
    }

    /// Wraps a backing-store error with the operation that hit it.
    pub(crate) fn storage(op: &str, message: impl std::fmt::Display) -> StoreError {
        StoreError::Storage(format!("{op}: {message}"))
    }
}
