use coffer_crypto::{make_rand, KeyLen, Mode, TextSecret};
use coffer_store::{CofferOptions, Keyring, MemoryStore, StoreError};
use std::sync::Arc;

fn options() -> CofferOptions {
    // CTR keeps key material out of any feedback path
    CofferOptions::with_aes(
        KeyLen::Bits256,
        Mode::Ctr,
        Arc::new(TextSecret::new("i-am-a-good-secret")),
    )
}

fn open_keyring() -> Keyring {
    let keyring = Keyring::new(Arc::new(MemoryStore::new()), options()).unwrap();
    keyring.open().unwrap();
    keyring
}

#[test]
fn put_get_roundtrip() {
    let keyring = open_keyring();
    let material = make_rand(32);
    keyring.put("signing-key", &material).unwrap();
    assert_eq!(keyring.get("signing-key").unwrap(), material);
}

#[test]
fn existing_names_are_never_replaced() {
    let keyring = open_keyring();
    let original = make_rand(32);
    keyring.put("signing-key", &original).unwrap();
    assert!(matches!(
        keyring.put("signing-key", &make_rand(32)),
        Err(StoreError::KeyExists)
    ));
    assert_eq!(keyring.get("signing-key").unwrap(), original);
}

#[test]
fn overwrites_stay_forbidden_regardless_of_options() {
    // the options do not forbid overwrites; the keyring does
    let keyring = open_keyring();
    keyring.put("k", &make_rand(16)).unwrap();
    assert!(keyring.put("k", &make_rand(16)).is_err());
}

#[test]
fn missing_names_are_not_found() {
    let keyring = open_keyring();
    assert!(matches!(
        keyring.get("no-such-key"),
        Err(StoreError::NotFound)
    ));
}

#[test]
fn has_delete_and_list() {
    let keyring = open_keyring();
    keyring.put("alpha", &make_rand(16)).unwrap();
    keyring.put("bravo", &make_rand(16)).unwrap();
    assert!(keyring.has("alpha").unwrap());

    let mut names = keyring.list().unwrap();
    names.sort();
    assert_eq!(names, vec!["alpha".to_string(), "bravo".to_string()]);

    keyring.delete("alpha").unwrap();
    assert!(!keyring.has("alpha").unwrap());
    // a deleted name can be reused
    keyring.put("alpha", &make_rand(16)).unwrap();
}

#[test]
fn export_writes_a_snapshot() {
    let keyring = open_keyring();
    keyring.put("alpha", &make_rand(16)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    keyring.export(dir.path()).unwrap();
    assert!(dir.path().join("memory-store.json").exists());
}
