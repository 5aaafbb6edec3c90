use coffer_crypto::CryptoError;
use thiserror::Error;

/// Errors from the encoding layer.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// An envelope failed structural validation.
    #[error("invalid package: {0}")]
    InvalidPackage(String),

    /// An envelope was written by a newer implementation.
    #[error("unsupported package version {0}")]
    UnsupportedVersion(String),

    /// The encryption or decryption callback failed.
    #[error("cipher failure: {0}")]
    Cipher(#[from] CryptoError),

    /// A codec failed, or a compressed envelope was met without a
    /// configured decompressor.
    #[error("compression failure: {0}")]
    Compression(String),

    /// An encoder or decoder session was misused.
    #[error("session error: {0}")]
    Session(String),

    /// JSON encoding or decoding of a record failed.
    #[error("record encoding: {0}")]
    Record(#[from] serde_json::Error),

    /// Envelope wire encoding failure.
    #[error("package encoding: {0}")]
    Wire(#[from] bincode::Error),
}

pub type EncodingResult<T> = Result<T, EncodingError>;
