use thiserror::Error;

/// Errors from the cipher layer.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encryption was asked to process an empty buffer.
    #[error("plaintext cannot be empty")]
    EmptyPlaintext,

    /// Decryption was asked to process an empty buffer.
    #[error("ciphertext cannot be empty")]
    EmptyCiphertext,

    /// A cipher block failed structural validation.
    #[error("invalid cipher block: {0}")]
    InvalidBlock(String),

    /// Subkey derivation failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Underlying cipher failure on encrypt.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Underlying cipher failure on decrypt (wrong key or tampered data).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// An encryptor chain was built without members.
    #[error("encryptor chain requires at least one encryptor")]
    EmptyChain,

    /// Cipher block wire encoding failure.
    #[error("cipher block encoding: {0}")]
    Encoding(#[from] bincode::Error),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
