//! Record encoding for coffer.
//!
//! Turns structured records into encrypted, optionally compressed binary
//! envelopes, with support for per-field transforms driven by a schema:
//!
//! - `secure` fields are stripped from the encoding and diverted into a
//!   lookup table that is the only thing encrypted; a synthetic lookup
//!   key takes their place in the cleartext side-car
//! - `hash` fields (strings) are replaced by `"sha256:<digest>"` before
//!   any further processing
//!
//! A record with at least one `secure` field seals as a *sparse* envelope:
//! encrypted lookup table plus cleartext side-car. The side-car can later
//! be decoded without the decryption key, with secure fields replaced by
//! kind-appropriate empty values. A record with no `secure` fields seals
//! as a *secure* envelope: the whole encoding is encrypted.
//!
//! # Decoding without the key
//!
//! ```no_run
//! # use coffer_encoding::{secure_unmarshal, DecodeOptions};
//! # use serde::Deserialize;
//! # #[derive(Deserialize)] struct Login { user: String, password: String }
//! # let sealed: Vec<u8> = vec![];
//! // the decrypt callback is never invoked on the sparse path
//! let login: Login = secure_unmarshal(
//!     &sealed,
//!     |_| unreachable!("sparse decode does not decrypt"),
//!     DecodeOptions::default().sparse(),
//! )?;
//! # Ok::<(), coffer_encoding::EncodingError>(())
//! ```

mod compress;
mod error;
mod hash;
mod lookup;
mod package;
mod schema;
mod secure;
pub mod tags;

pub use compress::{
    decode_format, encode_format, zstd_compress, zstd_decompress, CompressionFormat, CompressorFn,
    DecompressorFn,
};
pub use error::{EncodingError, EncodingResult};
pub use hash::{hash_function_for, HashingFn};
pub use lookup::{lookup_token, Kind, LookupKey, LOOKUP_PREFIX};
pub use package::{
    decode_package, encode_package, Package, PackageFormat, MIN_CIPHER_LENGTH, PACKAGE_VERSION,
};
pub use schema::{Describe, Field, Schema, SchemaBuilder};
pub use secure::{
    secure_marshal, secure_unmarshal, DecodeOptions, EncodeOptions, SecureDecoder, SecureEncoder,
};
