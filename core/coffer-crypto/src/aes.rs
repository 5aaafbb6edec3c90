//! AES primitives.
//!
//! Each function takes `(key length, secret bytes, data)` and produces or
//! consumes a serialized [`CipherBlock`]. A fresh salt is generated per
//! encryption and the subkey derived from it; stream modes carry a fresh
//! iv in the header, GCM a fresh nonce with the tag appended to the
//! ciphertext.

use crate::block::{BlockHeader, CipherBlock};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{derive_key, KeyLen};
use crate::mode::Mode;
use crate::random::{make_nonce, make_rand, make_salt, NONCE_LENGTH};
use ::aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::Aead;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, KeyInit, Nonce};
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit, StreamCipher};

/// AES block size in bytes; also the iv length for stream modes.
pub const AES_BLOCK_SIZE: usize = 16;

const CIPHER: &str = "aes";

type Aes128Cfb = cfb_mode::Encryptor<Aes128>;
type Aes192Cfb = cfb_mode::Encryptor<Aes192>;
type Aes256Cfb = cfb_mode::Encryptor<Aes256>;
type Aes128CfbDec = cfb_mode::Decryptor<Aes128>;
type Aes192CfbDec = cfb_mode::Decryptor<Aes192>;
type Aes256CfbDec = cfb_mode::Decryptor<Aes256>;

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes192Ctr = ctr::Ctr128BE<Aes192>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// AES-CFB encryption for 128/192/256-bit keys.
pub fn encrypt_cfb(key_len: KeyLen, secret: &[u8], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    if plaintext.is_empty() {
        return Err(CryptoError::EmptyPlaintext);
    }
    let salt = make_salt();
    let iv = make_rand(AES_BLOCK_SIZE);
    let key = derive_key(key_len, secret, &salt)?;
    let mut buf = plaintext.to_vec();
    match key_len {
        KeyLen::Bits128 => cfb_new::<Aes128Cfb>(&key, &iv)?.encrypt(&mut buf),
        KeyLen::Bits192 => cfb_new::<Aes192Cfb>(&key, &iv)?.encrypt(&mut buf),
        KeyLen::Bits256 => cfb_new::<Aes256Cfb>(&key, &iv)?.encrypt(&mut buf),
    }
    seal_block(key_len, Mode::Cfb, salt, Some(iv), None, buf)
}

/// AES-CFB decryption for 128/192/256-bit keys.
pub fn decrypt_cfb(key_len: KeyLen, secret: &[u8], ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    let block = open_block(ciphertext)?;
    let iv = stream_iv(&block)?;
    let key = derive_key(key_len, secret, &block.header.salt)?;
    let mut buf = block.bytes;
    match key_len {
        KeyLen::Bits128 => cfb_new::<Aes128CfbDec>(&key, &iv)?.decrypt(&mut buf),
        KeyLen::Bits192 => cfb_new::<Aes192CfbDec>(&key, &iv)?.decrypt(&mut buf),
        KeyLen::Bits256 => cfb_new::<Aes256CfbDec>(&key, &iv)?.decrypt(&mut buf),
    }
    Ok(buf)
}

/// AES-CTR encryption for 128/192/256-bit keys.
pub fn encrypt_ctr(key_len: KeyLen, secret: &[u8], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    if plaintext.is_empty() {
        return Err(CryptoError::EmptyPlaintext);
    }
    let salt = make_salt();
    let iv = make_rand(AES_BLOCK_SIZE);
    let key = derive_key(key_len, secret, &salt)?;
    let mut buf = plaintext.to_vec();
    ctr_apply(key_len, &key, &iv, &mut buf)?;
    seal_block(key_len, Mode::Ctr, salt, Some(iv), None, buf)
}

/// AES-CTR decryption for 128/192/256-bit keys.
pub fn decrypt_ctr(key_len: KeyLen, secret: &[u8], ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    let block = open_block(ciphertext)?;
    let iv = stream_iv(&block)?;
    let key = derive_key(key_len, secret, &block.header.salt)?;
    let mut buf = block.bytes;
    ctr_apply(key_len, &key, &iv, &mut buf)?;
    Ok(buf)
}

/// AES-GCM encryption for 128/192/256-bit keys.
pub fn encrypt_gcm(key_len: KeyLen, secret: &[u8], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    if plaintext.is_empty() {
        return Err(CryptoError::EmptyPlaintext);
    }
    let salt = make_salt();
    let nonce = make_nonce();
    let key = derive_key(key_len, secret, &salt)?;
    let bytes = gcm_seal(key_len, &key, &nonce, plaintext)?;
    seal_block(key_len, Mode::Gcm, salt, None, Some(nonce), bytes)
}

/// AES-GCM decryption for 128/192/256-bit keys.
pub fn decrypt_gcm(key_len: KeyLen, secret: &[u8], ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    let block = open_block(ciphertext)?;
    let nonce = block
        .header
        .nonce
        .as_ref()
        .ok_or_else(|| CryptoError::InvalidBlock("nonce required".into()))?;
    if nonce.len() != NONCE_LENGTH {
        return Err(CryptoError::InvalidBlock(format!(
            "nonce length {} != {}",
            nonce.len(),
            NONCE_LENGTH
        )));
    }
    let key = derive_key(key_len, secret, &block.header.salt)?;
    gcm_open(key_len, &key, nonce, &block.bytes)
}

fn cfb_new<C: KeyIvInit>(key: &[u8], iv: &[u8]) -> CryptoResult<C> {
    C::new_from_slices(key, iv).map_err(|e| CryptoError::Encryption(e.to_string()))
}

fn ctr_apply(key_len: KeyLen, key: &[u8], iv: &[u8], buf: &mut [u8]) -> CryptoResult<()> {
    match key_len {
        KeyLen::Bits128 => ctr_new::<Aes128Ctr>(key, iv)?.apply_keystream(buf),
        KeyLen::Bits192 => ctr_new::<Aes192Ctr>(key, iv)?.apply_keystream(buf),
        KeyLen::Bits256 => ctr_new::<Aes256Ctr>(key, iv)?.apply_keystream(buf),
    }
    Ok(())
}

fn ctr_new<C: KeyIvInit>(key: &[u8], iv: &[u8]) -> CryptoResult<C> {
    C::new_from_slices(key, iv).map_err(|e| CryptoError::Encryption(e.to_string()))
}

fn gcm_seal(key_len: KeyLen, key: &[u8], nonce: &[u8], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let nonce: &Nonce<U12> = Nonce::from_slice(nonce);
    let sealed = match key_len {
        KeyLen::Bits128 => gcm_new::<Aes128Gcm>(key)?.encrypt(nonce, plaintext),
        KeyLen::Bits192 => gcm_new::<Aes192Gcm>(key)?.encrypt(nonce, plaintext),
        KeyLen::Bits256 => gcm_new::<Aes256Gcm>(key)?.encrypt(nonce, plaintext),
    };
    sealed.map_err(|e| CryptoError::Encryption(e.to_string()))
}

fn gcm_open(key_len: KeyLen, key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    let nonce: &Nonce<U12> = Nonce::from_slice(nonce);
    let opened = match key_len {
        KeyLen::Bits128 => gcm_new::<Aes128Gcm>(key)?.decrypt(nonce, ciphertext),
        KeyLen::Bits192 => gcm_new::<Aes192Gcm>(key)?.decrypt(nonce, ciphertext),
        KeyLen::Bits256 => gcm_new::<Aes256Gcm>(key)?.decrypt(nonce, ciphertext),
    };
    opened.map_err(|_| CryptoError::Decryption("wrong key or tampered data".into()))
}

fn gcm_new<C: KeyInit>(key: &[u8]) -> CryptoResult<C> {
    C::new_from_slice(key).map_err(|e| CryptoError::Encryption(e.to_string()))
}

fn seal_block(
    key_len: KeyLen,
    mode: Mode,
    salt: Vec<u8>,
    iv: Option<Vec<u8>>,
    nonce: Option<Vec<u8>>,
    bytes: Vec<u8>,
) -> CryptoResult<Vec<u8>> {
    let header = BlockHeader::new(CIPHER, key_len, mode, salt, iv, nonce)?;
    CipherBlock::new(header, bytes).encode()
}

fn open_block(ciphertext: &[u8]) -> CryptoResult<CipherBlock> {
    if ciphertext.is_empty() {
        return Err(CryptoError::EmptyCiphertext);
    }
    CipherBlock::decode(ciphertext)
}

fn stream_iv(block: &CipherBlock) -> CryptoResult<Vec<u8>> {
    let iv = block
        .header
        .iv
        .as_ref()
        .ok_or_else(|| CryptoError::InvalidBlock("iv required".into()))?;
    if iv.len() < AES_BLOCK_SIZE {
        return Err(CryptoError::InvalidBlock(format!(
            "iv length {} < {} minimum",
            iv.len(),
            AES_BLOCK_SIZE
        )));
    }
    Ok(iv.clone())
}
