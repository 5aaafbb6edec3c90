//! The encryptor capability.
//!
//! Consumers depend on `Arc<dyn Encryptor>` and never see raw keys or
//! cipher internals. [`AesEncryptor`] is the standard implementation;
//! chains of encryptors compose through
//! [`ChainEncryptor`](crate::ChainEncryptor).

use crate::aes;
use crate::block::cipher_name;
use crate::error::CryptoResult;
use crate::key::KeyLen;
use crate::mode::Mode;
use crate::secret::Secret;
use std::sync::Arc;

/// Trait for supplying cipher implementations to the store.
pub trait Encryptor: Send + Sync {
    /// The id of the secret used to encrypt the data.
    fn id(&self) -> String;

    /// The name of the encryption cipher, key length, and mode used to
    /// encrypt the data, e.g. `"aes192-ctr"`.
    fn name(&self) -> String;

    /// Returns data encrypted with the secret.
    fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Returns data decrypted with the secret.
    fn decrypt(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>>;
}

/// An encryptor supporting AES-CFB, AES-CTR, and AES-GCM with
/// 128/192/256-bit keys.
pub struct AesEncryptor {
    secret: Arc<dyn Secret>,
    key_len: KeyLen,
    mode: Mode,
}

impl AesEncryptor {
    pub fn new(key_len: KeyLen, mode: Mode, secret: Arc<dyn Secret>) -> Self {
        Self {
            secret,
            key_len,
            mode,
        }
    }
}

impl Encryptor for AesEncryptor {
    fn id(&self) -> String {
        self.secret.id().to_string()
    }

    fn name(&self) -> String {
        cipher_name("aes", self.key_len, self.mode)
    }

    fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let secret = self.secret.open();
        match self.mode {
            Mode::Cfb => aes::encrypt_cfb(self.key_len, &secret, plaintext),
            Mode::Ctr => aes::encrypt_ctr(self.key_len, &secret, plaintext),
            Mode::Gcm => aes::encrypt_gcm(self.key_len, &secret, plaintext),
        }
    }

    fn decrypt(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
        let secret = self.secret.open();
        match self.mode {
            Mode::Cfb => aes::decrypt_cfb(self.key_len, &secret, ciphertext),
            Mode::Ctr => aes::decrypt_ctr(self.key_len, &secret, ciphertext),
            Mode::Gcm => aes::decrypt_gcm(self.key_len, &secret, ciphertext),
        }
    }
}
