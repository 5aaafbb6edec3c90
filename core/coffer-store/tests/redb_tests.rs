use coffer_crypto::{KeyLen, Mode, TextSecret};
use coffer_store::{Coffer, CofferOptions, RedbStore, StoreError, Storage};
use std::path::Path;
use std::sync::Arc;

const NAMESPACE: &str = "test-namespace";
const TEST_VALUE: &[u8] = b"i-am-plaintext";

fn options() -> CofferOptions {
    CofferOptions::with_aes(
        KeyLen::Bits256,
        Mode::Cfb,
        Arc::new(TextSecret::new("i-am-a-good-secret")),
    )
}

fn open_coffer(dir: &Path) -> Coffer {
    let store = Arc::new(RedbStore::new(dir.join("coffer.redb")));
    let coffer = Coffer::new(store, options()).unwrap();
    coffer.open().unwrap();
    coffer
}

#[test]
fn put_get_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let coffer = open_coffer(dir.path());
    coffer.put(NAMESPACE, b"key", TEST_VALUE).unwrap();
    assert_eq!(coffer.get(NAMESPACE, b"key").unwrap(), TEST_VALUE);
    coffer.close().unwrap();
}

#[test]
fn values_survive_a_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let coffer = open_coffer(dir.path());
    coffer.put(NAMESPACE, b"key", TEST_VALUE).unwrap();
    coffer.close().unwrap();
    drop(coffer);

    let coffer = open_coffer(dir.path());
    assert_eq!(coffer.get(NAMESPACE, b"key").unwrap(), TEST_VALUE);
    coffer.close().unwrap();
}

#[test]
fn operations_require_an_open_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = RedbStore::new(dir.path().join("coffer.redb"));
    assert!(matches!(
        store.put(NAMESPACE, b"key", TEST_VALUE),
        Err(StoreError::Storage(_))
    ));
    assert!(matches!(
        store.get(NAMESPACE, b"key"),
        Err(StoreError::Storage(_))
    ));
}

#[test]
fn get_missing_key_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let coffer = open_coffer(dir.path());
    assert!(matches!(
        coffer.get(NAMESPACE, b"not-found"),
        Err(StoreError::NotFound)
    ));
    // missing namespace behaves the same as a missing key
    assert!(matches!(
        coffer.get("no-such-namespace", b"key"),
        Err(StoreError::NotFound)
    ));
    coffer.close().unwrap();
}

#[test]
fn namespaces_map_to_separate_tables() {
    let dir = tempfile::tempdir().unwrap();
    let coffer = open_coffer(dir.path());
    coffer.put("a", b"key", b"first").unwrap();
    coffer.put("b", b"key", b"second").unwrap();
    assert_eq!(coffer.get("a", b"key").unwrap(), b"first");
    assert_eq!(coffer.get("b", b"key").unwrap(), b"second");
    coffer.close().unwrap();
}

#[test]
fn delete_and_has() {
    let dir = tempfile::tempdir().unwrap();
    let coffer = open_coffer(dir.path());
    coffer.put(NAMESPACE, b"key", TEST_VALUE).unwrap();
    assert!(coffer.has(NAMESPACE, b"key").unwrap());
    coffer.delete(NAMESPACE, b"key").unwrap();
    assert!(!coffer.has(NAMESPACE, b"key").unwrap());
    coffer.delete(NAMESPACE, b"not-found").unwrap();
    coffer.close().unwrap();
}

#[test]
fn list_returns_keys_in_byte_order() {
    let dir = tempfile::tempdir().unwrap();
    let coffer = open_coffer(dir.path());
    for key in [b"charlie".as_slice(), b"alpha".as_slice(), b"bravo".as_slice()] {
        coffer.put(NAMESPACE, key, TEST_VALUE).unwrap();
    }
    let keys = coffer.list(NAMESPACE).unwrap();
    assert_eq!(
        keys,
        vec![b"alpha".to_vec(), b"bravo".to_vec(), b"charlie".to_vec()]
    );
    // an unknown namespace lists empty
    assert!(coffer.list("no-such-namespace").unwrap().is_empty());
    coffer.close().unwrap();
}

#[test]
fn export_copies_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let coffer = open_coffer(dir.path());
    coffer.put(NAMESPACE, b"key", TEST_VALUE).unwrap();
    let export_dir = tempfile::tempdir().unwrap();
    coffer.export(export_dir.path()).unwrap();
    assert!(export_dir.path().join("coffer.redb").exists());
    coffer.close().unwrap();
}
