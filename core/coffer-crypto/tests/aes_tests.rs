use coffer_crypto::{
    decrypt_cfb, decrypt_ctr, decrypt_gcm, encrypt_cfb, encrypt_ctr, encrypt_gcm, AesEncryptor,
    CipherBlock, Encryptor, KeyLen, Mode, TextSecret,
};
use std::sync::Arc;

const SECRET: &[u8] = b"i-am-a-good-secret";
const PLAINTEXT: &[u8] = b"i-am-plaintext";

const KEY_LENS: [KeyLen; 3] = [KeyLen::Bits128, KeyLen::Bits192, KeyLen::Bits256];

#[test]
fn cfb_roundtrip_all_key_lengths() {
    for len in KEY_LENS {
        let sealed = encrypt_cfb(len, SECRET, PLAINTEXT).unwrap();
        let opened = decrypt_cfb(len, SECRET, &sealed).unwrap();
        assert_eq!(opened, PLAINTEXT, "cfb {len}");
    }
}

#[test]
fn ctr_roundtrip_all_key_lengths() {
    for len in KEY_LENS {
        let sealed = encrypt_ctr(len, SECRET, PLAINTEXT).unwrap();
        let opened = decrypt_ctr(len, SECRET, &sealed).unwrap();
        assert_eq!(opened, PLAINTEXT, "ctr {len}");
    }
}

#[test]
fn gcm_roundtrip_all_key_lengths() {
    for len in KEY_LENS {
        let sealed = encrypt_gcm(len, SECRET, PLAINTEXT).unwrap();
        let opened = decrypt_gcm(len, SECRET, &sealed).unwrap();
        assert_eq!(opened, PLAINTEXT, "gcm {len}");
    }
}

#[test]
fn empty_plaintext_is_rejected() {
    assert!(encrypt_cfb(KeyLen::Bits256, SECRET, b"").is_err());
    assert!(encrypt_ctr(KeyLen::Bits256, SECRET, b"").is_err());
    assert!(encrypt_gcm(KeyLen::Bits256, SECRET, b"").is_err());
}

#[test]
fn empty_ciphertext_is_rejected() {
    assert!(decrypt_cfb(KeyLen::Bits256, SECRET, b"").is_err());
    assert!(decrypt_ctr(KeyLen::Bits256, SECRET, b"").is_err());
    assert!(decrypt_gcm(KeyLen::Bits256, SECRET, b"").is_err());
}

#[test]
fn malformed_block_is_rejected() {
    assert!(decrypt_cfb(KeyLen::Bits256, SECRET, b"garbage-bytes").is_err());
    assert!(decrypt_gcm(KeyLen::Bits256, SECRET, b"garbage-bytes").is_err());
}

#[test]
fn each_encryption_produces_different_ciphertext() {
    // fresh salt and iv per call
    let a = encrypt_cfb(KeyLen::Bits256, SECRET, PLAINTEXT).unwrap();
    let b = encrypt_cfb(KeyLen::Bits256, SECRET, PLAINTEXT).unwrap();
    assert_ne!(a, b);
}

#[test]
fn gcm_wrong_secret_fails() {
    let sealed = encrypt_gcm(KeyLen::Bits256, SECRET, PLAINTEXT).unwrap();
    assert!(decrypt_gcm(KeyLen::Bits256, b"wrong-secret", &sealed).is_err());
}

#[test]
fn gcm_tampered_ciphertext_fails() {
    let sealed = encrypt_gcm(KeyLen::Bits256, SECRET, PLAINTEXT).unwrap();
    let mut block = CipherBlock::decode(&sealed).unwrap();
    block.bytes[0] ^= 0xFF;
    let tampered = block.encode().unwrap();
    assert!(decrypt_gcm(KeyLen::Bits256, SECRET, &tampered).is_err());
}

#[test]
fn block_header_describes_the_encryption() {
    let sealed = encrypt_gcm(KeyLen::Bits192, SECRET, PLAINTEXT).unwrap();
    let block = CipherBlock::decode(&sealed).unwrap();
    assert_eq!(block.header.cipher, "aes");
    assert_eq!(block.header.key_len, KeyLen::Bits192);
    assert_eq!(block.header.mode, Mode::Gcm);
    assert!(block.header.salt.len() >= 32);
    assert_eq!(block.header.nonce.as_ref().map(Vec::len), Some(12));
    assert!(block.header.iv.is_none());
    assert_eq!(block.header.name(), "aes192-gcm");
}

#[test]
fn stream_block_carries_an_iv() {
    let sealed = encrypt_ctr(KeyLen::Bits128, SECRET, PLAINTEXT).unwrap();
    let block = CipherBlock::decode(&sealed).unwrap();
    assert_eq!(block.header.iv.as_ref().map(Vec::len), Some(16));
    assert!(block.header.nonce.is_none());
}

#[test]
fn aes_encryptor_roundtrips_every_combination() {
    let secret = Arc::new(TextSecret::new("i-am-a-good-secret"));
    for len in KEY_LENS {
        for mode in [Mode::Cfb, Mode::Ctr, Mode::Gcm] {
            let enc = AesEncryptor::new(len, mode, secret.clone());
            let sealed = enc.encrypt(PLAINTEXT).unwrap();
            assert_ne!(sealed, PLAINTEXT);
            let opened = enc.decrypt(&sealed).unwrap();
            assert_eq!(opened, PLAINTEXT, "{}", enc.name());
        }
    }
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn gcm_always_roundtrips(data in proptest::collection::vec(any::<u8>(), 1..512)) {
            let sealed = encrypt_gcm(KeyLen::Bits256, SECRET, &data).unwrap();
            let opened = decrypt_gcm(KeyLen::Bits256, SECRET, &sealed).unwrap();
            prop_assert_eq!(opened, data);
        }

        #[test]
        fn cfb_always_roundtrips(data in proptest::collection::vec(any::<u8>(), 1..512)) {
            let sealed = encrypt_cfb(KeyLen::Bits128, SECRET, &data).unwrap();
            let opened = decrypt_cfb(KeyLen::Bits128, SECRET, &sealed).unwrap();
            prop_assert_eq!(opened, data);
        }
    }
}
