//! Keyed values.
//!
//! A [`Keyed`] value knows its own namespace and key, so it can be saved
//! and loaded without the caller tracking either. [`SecureValue`] is a
//! ready-made record for sparsely encrypted blobs with cleartext
//! metadata.

use crate::error::StoreResult;
use crate::storage::valid_key;
use coffer_encoding::{Describe, Schema};
use serde::{Deserialize, Serialize};

/// A value that carries its own storage key.
pub trait Keyed {
    /// The byte representation of the key.
    fn key(&self) -> Vec<u8>;

    /// The namespace to store the key under.
    fn namespace(&self) -> String;

    /// Returns `Ok` if the key is valid.
    fn valid_key(&self) -> StoreResult<()> {
        valid_key(&self.namespace(), &self.key())
    }
}

/// A string id implementing [`Keyed`]: the namespace is the id's first
/// character, which spreads values over namespaces by prefix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueId {
    pub id: String,
}

impl ValueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Keyed for ValueId {
    fn key(&self) -> Vec<u8> {
        self.id.as_bytes().to_vec()
    }

    fn namespace(&self) -> String {
        self.id.chars().next().map(String::from).unwrap_or_default()
    }
}

impl std::fmt::Display for ValueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

/// A value for storing a sparsely encrypted blob alongside cleartext
/// metadata: `data` is encrypted, `metadata` stays readable without the
/// key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SecureValue {
    #[serde(flatten)]
    pub id: ValueId,
    pub data: Vec<u8>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl SecureValue {
    pub fn new(id: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            id: ValueId::new(id),
            data,
            metadata: serde_json::Map::new(),
        }
    }

    /// A value with only an id, for loading into.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self::new(id, Vec::new())
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn get_metadata(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }
}

impl Keyed for SecureValue {
    fn key(&self) -> Vec<u8> {
        self.id.key()
    }

    fn namespace(&self) -> String {
        self.id.namespace()
    }
}

impl Describe for SecureValue {
    fn schema() -> Schema {
        Schema::builder().field("data,secure").build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_id_namespace_is_the_first_character() {
        let id = ValueId::new("abc-123");
        assert_eq!(id.namespace(), "a");
        assert_eq!(id.key(), b"abc-123");
        assert!(id.valid_key().is_ok());
    }

    #[test]
    fn empty_id_is_invalid() {
        let id = ValueId::default();
        assert!(id.valid_key().is_err());
    }

    #[test]
    fn secure_value_flattens_its_id() {
        let value = SecureValue::new("abc", b"blob".to_vec());
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["id"], "abc");
        assert!(json.get("data").is_some());
    }

    #[test]
    fn secure_value_metadata_accessors() {
        let mut value = SecureValue::new("abc", vec![]);
        value.set_metadata("origin", "unit-test");
        assert_eq!(
            value.get_metadata("origin").and_then(|v| v.as_str()),
            Some("unit-test")
        );
        assert!(value.get_metadata("missing").is_none());
    }

    #[test]
    fn secure_value_schema_secures_data() {
        let schema = SecureValue::schema();
        assert!(schema.has_secure_fields());
        assert_eq!(schema.fields()[0].name, "data");
    }
}
