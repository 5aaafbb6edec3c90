//! The secure record coder.
//!
//! [`SecureEncoder`] and [`SecureDecoder`] are single-threaded sessions
//! that move a record between its in-memory form and a sealed envelope.
//! Both follow a `Closed → Open → Closed` life cycle; the encoder seals
//! after encoding, the decoder unseals before opening (unseal primes the
//! lookup table).

mod decoder;
mod encoder;
mod options;

pub use decoder::SecureDecoder;
pub use encoder::SecureEncoder;
pub use options::{DecodeOptions, EncodeOptions};

use crate::error::EncodingResult;
use crate::schema::Schema;
use coffer_crypto::{make_rand, CryptoResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SessionState {
    Closed,
    Open,
}

/// Mints a random 8-hex-character encoder id. The id is only used to
/// scope lookup keys within one envelope, so uniqueness across encoders
/// is not required.
pub(crate) fn new_encoder_id() -> String {
    hex::encode(make_rand(4))
}

/// Encodes `value` under `schema` and seals it into an envelope using
/// the encryption callback. Drives a full encoder session.
pub fn secure_marshal<T, F>(
    value: &T,
    schema: &Schema,
    encrypt: F,
    opts: EncodeOptions,
) -> EncodingResult<Vec<u8>>
where
    T: Serialize,
    F: Fn(&[u8]) -> CryptoResult<Vec<u8>>,
{
    let mut encoder = SecureEncoder::new(None, encrypt, opts);
    encoder.open()?;
    let encoded = encoder.encode(value, schema)?;
    encoder.close();
    encoder.seal(encoded)
}

/// Unseals an envelope and decodes the record. With the sparse option
/// set and a sparse envelope, the decryption callback is never invoked
/// and secure fields come back as kind-appropriate empty values.
pub fn secure_unmarshal<T, F>(data: &[u8], decrypt: F, opts: DecodeOptions) -> EncodingResult<T>
where
    T: DeserializeOwned,
    F: Fn(&[u8]) -> CryptoResult<Vec<u8>>,
{
    let mut decoder = SecureDecoder::new(None, decrypt, opts);
    let unsealed = decoder.unseal(data)?;
    decoder.open()?;
    decoder.decode(&unsealed)
}
