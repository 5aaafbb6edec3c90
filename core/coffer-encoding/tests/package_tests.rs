use coffer_encoding::{
    decode_package, encode_package, EncodingError, Package, PackageFormat, PACKAGE_VERSION,
};

const ENCODER_ID: &str = "ab12cd34";
const TOKEN: &str = "cfab12cd34";

fn cipher() -> Vec<u8> {
    vec![0xAA; 16]
}

#[test]
fn empty_encoded_data_seals_as_secure() {
    let sealed = encode_package(ENCODER_ID, "", cipher(), vec![], false).unwrap();
    let package = decode_package(&sealed).unwrap();
    assert_eq!(package.format, PackageFormat::Secure);
    assert_eq!(package.version, PACKAGE_VERSION);
    assert_eq!(package.encoder_id, ENCODER_ID);
    assert!(package.token.is_empty());
    assert!(package.encoded.is_empty());
}

#[test]
fn sidecar_data_seals_as_sparse() {
    let sealed = encode_package(ENCODER_ID, TOKEN, cipher(), b"{\"k\":1}".to_vec(), false).unwrap();
    let package = decode_package(&sealed).unwrap();
    assert_eq!(package.format, PackageFormat::Sparse);
    assert_eq!(package.token, TOKEN);
    assert_eq!(package.encoded, b"{\"k\":1}");
}

#[test]
fn missing_encoder_id_is_rejected() {
    assert!(encode_package("", TOKEN, cipher(), vec![], false).is_err());
}

#[test]
fn sparse_without_a_token_is_rejected() {
    assert!(encode_package(ENCODER_ID, "", cipher(), b"{\"k\":1}".to_vec(), false).is_err());
}

#[test]
fn short_cipher_is_rejected() {
    assert!(encode_package(ENCODER_ID, "", vec![1, 2], vec![], false).is_err());
}

#[test]
fn sparse_sidecar_must_look_like_json() {
    assert!(encode_package(ENCODER_ID, TOKEN, cipher(), b"xy".to_vec(), false).is_err());
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_package(b"definitely-not-a-package").is_err());
}

#[test]
fn decode_rejects_newer_versions() {
    let package = Package {
        version: "9.9.9".into(),
        format: PackageFormat::Secure,
        compressed: false,
        encoder_id: ENCODER_ID.into(),
        token: String::new(),
        cipher: cipher(),
        encoded: vec![],
    };
    let bytes = bincode::serialize(&package).unwrap();
    match decode_package(&bytes) {
        Err(EncodingError::UnsupportedVersion(v)) => assert_eq!(v, "9.9.9"),
        other => panic!("expected UnsupportedVersion, got {other:?}"),
    }
}

#[test]
fn decode_rejects_unparseable_versions() {
    let package = Package {
        version: "latest".into(),
        format: PackageFormat::Secure,
        compressed: false,
        encoder_id: ENCODER_ID.into(),
        token: String::new(),
        cipher: cipher(),
        encoded: vec![],
    };
    let bytes = bincode::serialize(&package).unwrap();
    assert!(decode_package(&bytes).is_err());
}

#[test]
fn decode_rejects_tampered_shape() {
    // a sparse package whose sidecar was stripped after sealing
    let package = Package {
        version: PACKAGE_VERSION.into(),
        format: PackageFormat::Sparse,
        compressed: false,
        encoder_id: ENCODER_ID.into(),
        token: TOKEN.into(),
        cipher: cipher(),
        encoded: vec![],
    };
    let bytes = bincode::serialize(&package).unwrap();
    assert!(decode_package(&bytes).is_err());
}
