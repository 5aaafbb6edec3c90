//! Caller-owned key material.
//!
//! A [`Secret`] pairs a stable identifier with key material that is read
//! on demand. The id survives in encryptor ids so stored data can be
//! traced back to the secret that protected it.

use std::fmt;
use std::sync::Arc;

/// A provider of cipher key material with a stable id.
///
/// `id` must return the same value for the lifetime of the secret;
/// `open` may be called repeatedly.
pub trait Secret: Send + Sync {
    /// The id of the secret, for tracking and rollover.
    fn id(&self) -> &str;

    /// The byte representation of the secret for encryption and decryption.
    fn open(&self) -> Vec<u8>;
}

/// A plaintext secret with the fixed id `"text"`.
#[derive(Clone)]
pub struct TextSecret(String);

impl TextSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }
}

impl Secret for TextSecret {
    fn id(&self) -> &str {
        "text"
    }

    fn open(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }
}

/// A plaintext secret alongside a unique id.
#[derive(Clone)]
pub struct ManagedSecret {
    id: String,
    secret: String,
}

impl ManagedSecret {
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
        }
    }
}

impl Secret for ManagedSecret {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> Vec<u8> {
        self.secret.as_bytes().to_vec()
    }
}

/// A secret resolved through a callback on every `open`.
///
/// The callback receives the secret's id, which allows remote loading of
/// key material or keeping it in a hardened in-memory store between uses.
pub struct LazySecret {
    id: String,
    open: Arc<dyn Fn(&str) -> Vec<u8> + Send + Sync>,
}

impl LazySecret {
    pub fn new(
        id: impl Into<String>,
        open: impl Fn(&str) -> Vec<u8> + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            open: Arc::new(open),
        }
    }
}

impl Secret for LazySecret {
    fn id(&self) -> &str {
        &self.id
    }

    fn open(&self) -> Vec<u8> {
        (self.open)(&self.id)
    }
}

impl fmt::Debug for LazySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySecret").field("id", &self.id).finish()
    }
}
