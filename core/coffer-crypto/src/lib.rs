//! Cipher layer for coffer.
//!
//! Provides the primitives the encrypted store is built on:
//! - AES in CFB, CTR, and GCM modes with 128/192/256-bit keys
//! - scrypt subkey derivation from caller-owned secrets
//! - self-describing cipher blocks that carry their own salt/iv/nonce
//! - chained encryptors for layered encryption
//!
//! # Architecture
//!
//! Every encryption produces a serialized [`CipherBlock`]: a header naming
//! the cipher, key length, and mode plus the fresh salt and iv/nonce used,
//! followed by the ciphertext. Decryption needs nothing beyond the block
//! and the secret — the subkey is re-derived from the header's salt.
//!
//! Key material is owned by the caller behind the [`Secret`] trait and is
//! only read at the moment of encryption or decryption.

mod aes;
mod block;
mod chain;
mod encryptor;
mod error;
mod hash;
mod key;
mod mode;
mod random;
mod secret;

pub use self::aes::{
    decrypt_cfb, decrypt_ctr, decrypt_gcm, encrypt_cfb, encrypt_ctr, encrypt_gcm, AES_BLOCK_SIZE,
};
pub use block::{cipher_name, BlockHeader, CipherBlock, MIN_SALT_LENGTH};
pub use chain::ChainEncryptor;
pub use encryptor::{AesEncryptor, Encryptor};
pub use error::{CryptoError, CryptoResult};
pub use hash::sha256_hex;
pub use key::{derive_key, derive_key_with_cost, KeyLen, KEY_COST_LOG2};
pub use mode::Mode;
pub use random::{make_nonce, make_rand, make_salt, NONCE_LENGTH, SALT_LENGTH};
pub use secret::{LazySecret, ManagedSecret, Secret, TextSecret};
