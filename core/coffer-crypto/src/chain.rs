//! Chained encryption.
//!
//! A [`ChainEncryptor`] composes an ordered list of encryptors: ciphertext
//! flows forward through the list on encrypt and in reverse on decrypt.
//! The first member error aborts the walk.

use crate::encryptor::Encryptor;
use crate::error::{CryptoError, CryptoResult};
use std::sync::Arc;

const CHAIN_SEPARATOR: &str = " ";

/// An encryptor composed of a chain of other encryptors, applied in FIFO
/// order on encrypt and LIFO order on decrypt.
pub struct ChainEncryptor {
    id: String,
    name: String,
    encryptors: Vec<Arc<dyn Encryptor>>,
}

impl ChainEncryptor {
    /// Builds a chain from the supplied encryptors. At least one member
    /// is required.
    pub fn new(encryptors: Vec<Arc<dyn Encryptor>>) -> CryptoResult<Self> {
        if encryptors.is_empty() {
            return Err(CryptoError::EmptyChain);
        }
        let ids: Vec<String> = encryptors.iter().map(|e| e.id()).collect();
        let names: Vec<String> = encryptors.iter().map(|e| e.name()).collect();
        Ok(Self {
            id: ids.join(CHAIN_SEPARATOR),
            name: names.join(CHAIN_SEPARATOR),
            encryptors,
        })
    }
}

impl Encryptor for ChainEncryptor {
    /// Space-joined ids of the chained encryptors.
    fn id(&self) -> String {
        self.id.clone()
    }

    /// Space-joined cipher names of the chained encryptors.
    fn name(&self) -> String {
        self.name.clone()
    }

    fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut ciphertext = plaintext.to_vec();
        for encryptor in &self.encryptors {
            ciphertext = encryptor.encrypt(&ciphertext)?;
        }
        Ok(ciphertext)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
        let mut plaintext = ciphertext.to_vec();
        for encryptor in self.encryptors.iter().rev() {
            plaintext = encryptor.decrypt(&plaintext)?;
        }
        Ok(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the order it was invoked in so chain direction is observable.
    struct Tagged {
        tag: &'static str,
    }

    impl Encryptor for Tagged {
        fn id(&self) -> String {
            self.tag.to_string()
        }

        fn name(&self) -> String {
            format!("tagged-{}", self.tag)
        }

        fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
            let mut out = plaintext.to_vec();
            out.extend_from_slice(self.tag.as_bytes());
            Ok(out)
        }

        fn decrypt(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
            let stripped = ciphertext
                .strip_suffix(self.tag.as_bytes())
                .ok_or_else(|| CryptoError::Decryption(format!("missing {} suffix", self.tag)))?;
            Ok(stripped.to_vec())
        }
    }

    fn chain() -> ChainEncryptor {
        ChainEncryptor::new(vec![
            Arc::new(Tagged { tag: "a" }),
            Arc::new(Tagged { tag: "b" }),
            Arc::new(Tagged { tag: "c" }),
        ])
        .unwrap()
    }

    #[test]
    fn empty_chain_is_rejected() {
        assert!(ChainEncryptor::new(vec![]).is_err());
    }

    #[test]
    fn ids_and_names_are_space_joined() {
        let c = chain();
        assert_eq!(c.id(), "a b c");
        assert_eq!(c.name(), "tagged-a tagged-b tagged-c");
    }

    #[test]
    fn encrypt_walks_fifo() {
        let out = chain().encrypt(b"x").unwrap();
        assert_eq!(out, b"xabc");
    }

    #[test]
    fn decrypt_walks_lifo() {
        let c = chain();
        let out = c.decrypt(&c.encrypt(b"x").unwrap()).unwrap();
        assert_eq!(out, b"x");
    }

    #[test]
    fn member_error_aborts_the_walk() {
        let c = chain();
        // valid suffix for "c" only; "b" will fail during the reverse walk
        assert!(c.decrypt(b"zzc").is_err());
    }
}
