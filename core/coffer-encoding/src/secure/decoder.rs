//! The decoding half of the secure record coder.

use super::options::DecodeOptions;
use super::SessionState;
use crate::error::{EncodingError, EncodingResult};
use crate::lookup::LookupKey;
use crate::package::{decode_package, PackageFormat};
use coffer_crypto::CryptoResult;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// A decoder session.
///
/// [`SecureDecoder::unseal`] unwraps the envelope: for secure packages it
/// decrypts the whole record encoding; for sparse packages it decrypts
/// the lookup table and returns the cleartext side-car. With the sparse
/// option set on a sparse package, decryption is skipped entirely and
/// decoding substitutes kind-appropriate empty values for the lookup
/// keys found in the side-car.
pub struct SecureDecoder<F> {
    expected_id: Option<String>,
    decrypt: F,
    opts: DecodeOptions,
    token: String,
    lookup_bytes: Option<Vec<u8>>,
    table: Option<Value>,
    unsealed: bool,
    state: SessionState,
}

impl<F> SecureDecoder<F>
where
    F: Fn(&[u8]) -> CryptoResult<Vec<u8>>,
{
    /// Creates a decoder. When an expected encoder id is supplied, the
    /// decoder restricts itself to envelopes with a matching id.
    pub fn new(expected_id: Option<&str>, decrypt: F, opts: DecodeOptions) -> Self {
        Self {
            expected_id: expected_id.map(str::to_string),
            decrypt,
            opts,
            token: String::new(),
            lookup_bytes: None,
            table: None,
            unsealed: false,
            state: SessionState::Closed,
        }
    }

    /// Unwraps an envelope and returns the record-encoding bytes: the
    /// decrypted encoding for secure packages, the cleartext side-car
    /// for sparse ones. Primes the session's token and lookup table.
    pub fn unseal(&mut self, data: &[u8]) -> EncodingResult<Vec<u8>> {
        if self.state == SessionState::Open {
            self.close();
        }
        let mut package = decode_package(data)?;
        if let Some(expected) = &self.expected_id {
            if expected != &package.encoder_id {
                return Err(EncodingError::InvalidPackage(format!(
                    "encoder id mismatch: expected {expected}, package {}",
                    package.encoder_id
                )));
            }
        }
        let is_sparse = package.format == PackageFormat::Sparse && self.opts.sparse;
        debug!(format = %package.format, sparse = is_sparse, "unsealing package");
        if !is_sparse {
            // everything except the sparse projection needs the key
            package.cipher = (self.decrypt)(&package.cipher)?;
            if package.compressed {
                package.cipher = self.decompress(&package.cipher)?;
            }
        }
        match package.format {
            PackageFormat::Secure => {
                self.unsealed = true;
                Ok(package.cipher)
            }
            PackageFormat::Sparse => {
                self.token = package.token.clone();
                if !is_sparse {
                    self.lookup_bytes = Some(package.cipher);
                }
                if package.compressed {
                    package.encoded = self.decompress(&package.encoded)?;
                }
                self.unsealed = true;
                Ok(package.encoded)
            }
        }
    }

    /// Prepares the session for decoding. Must follow [`unseal`]; the
    /// lookup table is parsed here.
    ///
    /// [`unseal`]: SecureDecoder::unseal
    pub fn open(&mut self) -> EncodingResult<()> {
        if self.state == SessionState::Open {
            return Err(EncodingError::Session("decoder already open".into()));
        }
        if !self.unsealed {
            return Err(EncodingError::Session("open before unseal".into()));
        }
        if let Some(bytes) = self.lookup_bytes.take() {
            let table: Value = serde_json::from_slice(&bytes)?;
            if !table.is_object() {
                return Err(EncodingError::Session("lookup table is not an object".into()));
            }
            self.table = Some(table);
        }
        self.state = SessionState::Open;
        debug!(token = %self.token, "decoder open");
        Ok(())
    }

    /// Decodes the record-encoding bytes returned by [`unseal`],
    /// replacing lookup keys by their table entries — or by empty values
    /// when no table is present.
    ///
    /// [`unseal`]: SecureDecoder::unseal
    pub fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> EncodingResult<T> {
        if self.state != SessionState::Open {
            return Err(EncodingError::Session("decoder is not open".into()));
        }
        let mut tree: Value = serde_json::from_slice(data)?;
        if !self.token.is_empty() {
            self.restore(&mut tree);
        }
        Ok(serde_json::from_value(tree)?)
    }

    /// Ends the session and drops the lookup state.
    pub fn close(&mut self) {
        self.token.clear();
        self.lookup_bytes = None;
        self.table = None;
        self.unsealed = false;
        self.state = SessionState::Closed;
    }

    fn decompress(&self, data: &[u8]) -> EncodingResult<Vec<u8>> {
        let decompress = self.opts.decompressor.as_ref().ok_or_else(|| {
            EncodingError::Compression("compressed package requires a decompressor".into())
        })?;
        decompress(data)
    }

    /// Walks every string in the tree, swapping lookup keys for their
    /// table entries or kind-appropriate empty values.
    fn restore(&self, value: &mut Value) {
        match value {
            Value::String(s) => {
                if !LookupKey::is_token_key(s, &self.token) {
                    return;
                }
                let Some(key) = LookupKey::parse(s, &self.token) else {
                    // shares the prefix but is not a key; leave it alone
                    return;
                };
                let replacement = match self.table.as_ref().and_then(|t| t.get(s.as_str())) {
                    Some(entry) => entry.clone(),
                    None => {
                        debug!(key = %s, "no lookup entry, substituting empty value");
                        key.kind.empty_value()
                    }
                };
                *value = replacement;
            }
            Value::Array(items) => {
                for item in items {
                    self.restore(item);
                }
            }
            Value::Object(map) => {
                for entry in map.values_mut() {
                    self.restore(entry);
                }
            }
            _ => {}
        }
    }
}
