//! The encoding half of the secure record coder.

use super::options::EncodeOptions;
use super::{new_encoder_id, SessionState};
use crate::error::{EncodingError, EncodingResult};
use crate::hash::hash_function_for;
use crate::lookup::{lookup_token, Kind, LookupKey, LOOKUP_PREFIX};
use crate::package::encode_package;
use crate::schema::{Field, Schema};
use coffer_crypto::CryptoResult;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// An encoder session.
///
/// Encodes a record to its JSON form while diverting `secure` fields
/// into the session's lookup table, then seals the result into an
/// envelope: the lookup table is encrypted and the stripped encoding
/// rides along as the cleartext side-car. When no field was diverted the
/// whole encoding is encrypted instead.
pub struct SecureEncoder<F> {
    id: String,
    token: String,
    encrypt: F,
    opts: EncodeOptions,
    lookup: Map<String, Value>,
    next_index: usize,
    lookup_bytes: Option<Vec<u8>>,
    state: SessionState,
}

impl<F> SecureEncoder<F>
where
    F: Fn(&[u8]) -> CryptoResult<Vec<u8>>,
{
    /// Creates an encoder with the given id, or a fresh random one.
    pub fn new(encoder_id: Option<&str>, encrypt: F, opts: EncodeOptions) -> Self {
        let id = match encoder_id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => new_encoder_id(),
        };
        let token = lookup_token(LOOKUP_PREFIX, &id);
        Self {
            id,
            token,
            encrypt,
            opts,
            lookup: Map::new(),
            next_index: 0,
            lookup_bytes: None,
            state: SessionState::Closed,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Prepares the session for encoding. Opening an open session is an
    /// error.
    pub fn open(&mut self) -> EncodingResult<()> {
        if self.state == SessionState::Open {
            return Err(EncodingError::Session("encoder already open".into()));
        }
        self.lookup.clear();
        self.next_index = 0;
        self.lookup_bytes = None;
        self.state = SessionState::Open;
        debug!(encoder = %self.id, "encoder open");
        Ok(())
    }

    /// Encodes a record under its schema, accumulating diverted fields
    /// in the session lookup table. Returns the main encoding.
    pub fn encode<T: Serialize>(&mut self, value: &T, schema: &Schema) -> EncodingResult<Vec<u8>> {
        if self.state != SessionState::Open {
            return Err(EncodingError::Session("encoder is not open".into()));
        }
        let mut tree = serde_json::to_value(value)?;
        self.transform(&mut tree, schema);
        Ok(serde_json::to_vec(&tree)?)
    }

    /// Ends the encoding phase and captures the lookup table bytes.
    pub fn close(&mut self) {
        if self.state != SessionState::Open {
            return;
        }
        // an empty table captures as "{}", the sparse/secure discriminator
        self.lookup_bytes = Some(Value::Object(std::mem::take(&mut self.lookup)).to_string().into_bytes());
        self.state = SessionState::Closed;
        debug!(encoder = %self.id, "encoder closed");
    }

    /// Encrypts and packages the encoding. Closes the session first if
    /// it is still open.
    pub fn seal(&mut self, encoded: Vec<u8>) -> EncodingResult<Vec<u8>> {
        if self.state == SessionState::Open {
            self.close();
        }
        let lookup_bytes = self
            .lookup_bytes
            .take()
            .ok_or_else(|| EncodingError::Session("seal before open".into()))?;
        let sparse = lookup_bytes.len() > 2;
        let (mut plaintext, mut encoded, token) = if sparse {
            debug!(encoder = %self.id, "sealing sparse encoding");
            (lookup_bytes, encoded, self.token.clone())
        } else {
            debug!(encoder = %self.id, "sealing secure encoding");
            (encoded, Vec::new(), String::new())
        };
        let compressed = self.opts.compressor.is_some();
        if let Some(compress) = &self.opts.compressor {
            plaintext = compress(&plaintext)?;
            if !encoded.is_empty() {
                encoded = compress(&encoded)?;
            }
        }
        let cipher = (self.encrypt)(&plaintext)?;
        encode_package(&self.id, &token, cipher, encoded, compressed)
    }

    /// Applies the schema's field transforms to an encoded record tree.
    fn transform(&mut self, value: &mut Value, schema: &Schema) {
        let Value::Object(map) = value else {
            // tagged fields only exist on records
            return;
        };
        for field in schema.fields() {
            if field.skip {
                map.remove(&field.name);
                continue;
            }
            let Some(entry) = map.get_mut(&field.name) else {
                continue;
            };
            if field.omit_empty && is_empty_value(entry) {
                map.remove(&field.name);
                continue;
            }
            // hash runs first so secure diverts the hashed value
            if let Some(name) = &field.hash {
                self.hash_field(field, name, entry);
            }
            if field.secure {
                self.divert(entry);
                // the diverted subtree was encoded with tag handling
                // disabled; never recurse into it
                continue;
            }
            if let Some(nested) = &field.nested {
                match entry {
                    Value::Array(items) => {
                        for item in items {
                            self.transform(item, nested);
                        }
                    }
                    _ => self.transform(entry, nested),
                }
            }
        }
    }

    fn hash_field(&self, field: &Field, name: &str, entry: &mut Value) {
        let Value::String(s) = entry else {
            debug!(field = %field.name, "hash option on non-string field, ignored");
            return;
        };
        let Some(hash) = hash_function_for(name) else {
            warn!(field = %field.name, "{name} hash transform not found, field left unchanged");
            return;
        };
        let prefix = format!("{name}:");
        if s.starts_with(&prefix) {
            // already hashed, do not re-hash
            return;
        }
        *entry = Value::String(format!("{prefix}{}", hash(s.as_bytes())));
    }

    /// Moves a field's encoding into the lookup table, leaving the
    /// rendered lookup key in its place.
    fn divert(&mut self, entry: &mut Value) {
        let kind = Kind::of_value(entry);
        let key = LookupKey::new(self.next_index, kind).render(&self.token);
        self.next_index += 1;
        let diverted = std::mem::replace(entry, Value::String(key.clone()));
        debug!(%key, "diverted secure field to lookup table");
        self.lookup.insert(key, diverted);
    }
}

/// True for values `omitempty` treats as empty.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
