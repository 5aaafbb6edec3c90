//! Subkey derivation.
//!
//! Cipher keys are never used directly: each encryption derives a fresh
//! subkey from `(secret, salt)` with scrypt, so the block's salt is all a
//! decryptor needs alongside the secret itself.

use crate::error::{CryptoError, CryptoResult};
use scrypt::Params;
use serde::{Deserialize, Serialize};
use std::fmt;

/// scrypt cost exponent: N = 2^12 = 4096 iterations.
///
/// The strength of the secret is determined externally, so a moderate
/// cost keeps per-block derivation affordable.
pub const KEY_COST_LOG2: u8 = 12;

const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// Selects a 128, 192, or 256 bit cipher key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum KeyLen {
    Bits128,
    Bits192,
    Bits256,
}

impl KeyLen {
    /// Key length in bytes.
    pub fn bytes(self) -> usize {
        match self {
            KeyLen::Bits128 => 16,
            KeyLen::Bits192 => 24,
            KeyLen::Bits256 => 32,
        }
    }

    /// Key length in bits.
    pub fn bits(self) -> u16 {
        u16::from(self)
    }
}

impl From<KeyLen> for u16 {
    fn from(len: KeyLen) -> u16 {
        match len {
            KeyLen::Bits128 => 128,
            KeyLen::Bits192 => 192,
            KeyLen::Bits256 => 256,
        }
    }
}

impl TryFrom<u16> for KeyLen {
    type Error = String;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            128 => Ok(KeyLen::Bits128),
            192 => Ok(KeyLen::Bits192),
            256 => Ok(KeyLen::Bits256),
            other => Err(format!("unsupported key length {other}")),
        }
    }
}

impl fmt::Display for KeyLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Derives a cipher key of the given length from `(secret, salt)` using
/// scrypt with the default cost ([`KEY_COST_LOG2`], r=8, p=1).
pub fn derive_key(len: KeyLen, secret: &[u8], salt: &[u8]) -> CryptoResult<Vec<u8>> {
    derive_key_with_cost(len, KEY_COST_LOG2, secret, salt)
}

/// Derives a cipher key with an explicit scrypt cost exponent.
pub fn derive_key_with_cost(
    len: KeyLen,
    log_n: u8,
    secret: &[u8],
    salt: &[u8],
) -> CryptoResult<Vec<u8>> {
    let params = Params::new(log_n, SCRYPT_R, SCRYPT_P, len.bytes())
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    let mut key = vec![0u8; len.bytes()];
    scrypt::scrypt(secret, salt, &params, &mut key)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}
