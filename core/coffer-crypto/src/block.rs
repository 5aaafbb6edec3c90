//! Self-describing cipher blocks.
//!
//! A [`CipherBlock`] bundles ciphertext with the header a decryptor needs
//! to re-derive the subkey: cipher name, key length, mode, salt, and the
//! iv or nonce. Blocks travel as a stable binary encoding with fixed
//! field order.

use crate::error::{CryptoError, CryptoResult};
use crate::key::KeyLen;
use crate::mode::Mode;
use crate::random::NONCE_LENGTH;
use serde::{Deserialize, Serialize};

/// Minimum accepted salt length in bytes.
pub const MIN_SALT_LENGTH: usize = 8;

/// Returns the canonical cipher name in the format
/// `"[cipher][key length]-[mode]"`, e.g. `"aes192-ctr"`.
pub fn cipher_name(cipher: &str, key_len: KeyLen, mode: Mode) -> String {
    format!("{}{}-{}", cipher.to_lowercase(), key_len, mode)
}

/// Describes an encryption block: the cipher, key length, and mode used,
/// plus the subkey salt and the iv or nonce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub cipher: String,
    pub key_len: KeyLen,
    pub mode: Mode,
    pub salt: Vec<u8>,
    pub iv: Option<Vec<u8>>,
    pub nonce: Option<Vec<u8>>,
}

impl BlockHeader {
    /// Builds a header, lowercasing the cipher name and validating the
    /// salt and nonce lengths.
    pub fn new(
        cipher: &str,
        key_len: KeyLen,
        mode: Mode,
        salt: Vec<u8>,
        iv: Option<Vec<u8>>,
        nonce: Option<Vec<u8>>,
    ) -> CryptoResult<Self> {
        let header = Self {
            cipher: cipher.to_lowercase(),
            key_len,
            mode,
            salt,
            iv,
            nonce,
        };
        header.validate()?;
        Ok(header)
    }

    /// Structural validation of the header fields.
    pub fn validate(&self) -> CryptoResult<()> {
        if self.cipher.is_empty() {
            return Err(CryptoError::InvalidBlock("cipher required".into()));
        }
        if self.salt.len() < MIN_SALT_LENGTH {
            return Err(CryptoError::InvalidBlock(format!(
                "salt length {} < {} minimum",
                self.salt.len(),
                MIN_SALT_LENGTH
            )));
        }
        if let Some(nonce) = &self.nonce {
            if nonce.len() < NONCE_LENGTH {
                return Err(CryptoError::InvalidBlock(format!(
                    "nonce length {} < {} minimum",
                    nonce.len(),
                    NONCE_LENGTH
                )));
            }
        }
        Ok(())
    }

    /// The canonical name of the cipher this header describes.
    pub fn name(&self) -> String {
        cipher_name(&self.cipher, self.key_len, self.mode)
    }
}

/// A serializable wrapper for ciphertext with its [`BlockHeader`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherBlock {
    pub header: BlockHeader,
    pub bytes: Vec<u8>,
}

impl CipherBlock {
    pub fn new(header: BlockHeader, bytes: Vec<u8>) -> Self {
        Self { header, bytes }
    }

    /// Validates the header and that the block carries ciphertext.
    pub fn validate(&self) -> CryptoResult<()> {
        self.header
            .validate()
            .map_err(|e| CryptoError::InvalidBlock(format!("invalid header: {e}")))?;
        if self.bytes.is_empty() {
            return Err(CryptoError::InvalidBlock("empty ciphertext".into()));
        }
        Ok(())
    }

    /// Serializes a validated block to its binary wire form.
    pub fn encode(&self) -> CryptoResult<Vec<u8>> {
        self.validate()?;
        Ok(bincode::serialize(self)?)
    }

    /// Deserializes and validates a block from its binary wire form.
    pub fn decode(data: &[u8]) -> CryptoResult<Self> {
        let block: CipherBlock = bincode::deserialize(data)?;
        block.validate()?;
        Ok(block)
    }
}
