//! The envelope format.
//!
//! A [`Package`] is the versioned binary container persisted to the
//! backing store. Secure packages carry a fully encrypted record
//! encoding and nothing else; sparse packages carry the encrypted lookup
//! table plus the cleartext side-car in which secure fields have been
//! replaced by lookup keys. Validation here is purely structural —
//! ciphertext integrity belongs to the cipher.

use crate::error::{EncodingError, EncodingResult};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current envelope format version.
pub const PACKAGE_VERSION: &str = "0.0.1";

/// Minimum length of the ciphertext field.
pub const MIN_CIPHER_LENGTH: usize = 4;

/// Minimum length of sparse encoded data (`"{}"` is the empty object).
const MIN_SPARSE_LENGTH: usize = 2;

/// Minimum length of a compressed payload.
const MIN_COMPRESSED_LENGTH: usize = 8;

/// The package format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageFormat {
    /// The package contains a fully encrypted record encoding.
    Secure,
    /// The package supports sparse decoding: an encrypted lookup table
    /// plus a cleartext side-car.
    Sparse,
}

impl fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageFormat::Secure => f.write_str("secure"),
            PackageFormat::Sparse => f.write_str("sparse"),
        }
    }
}

/// The envelope persisted to the backing store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub version: String,
    pub format: PackageFormat,
    pub compressed: bool,
    pub encoder_id: String,
    pub token: String,
    pub cipher: Vec<u8>,
    pub encoded: Vec<u8>,
}

impl Package {
    /// Structural validation of the package fields.
    pub fn validate(&self) -> EncodingResult<()> {
        if self.version.is_empty() {
            return Err(EncodingError::InvalidPackage("version required".into()));
        }
        Version::parse(&self.version)
            .map_err(|e| EncodingError::InvalidPackage(format!("invalid version: {e}")))?;
        if self.encoder_id.is_empty() {
            return Err(EncodingError::InvalidPackage("encoder id required".into()));
        }
        if self.cipher.len() < MIN_CIPHER_LENGTH {
            return Err(EncodingError::InvalidPackage("invalid ciphertext".into()));
        }
        if self.compressed && self.cipher.len() < MIN_COMPRESSED_LENGTH {
            return Err(EncodingError::InvalidPackage(
                "invalid compressed ciphertext".into(),
            ));
        }
        match self.format {
            PackageFormat::Secure => {
                if !self.encoded.is_empty() {
                    return Err(EncodingError::InvalidPackage(
                        "secure package carries encoded data".into(),
                    ));
                }
            }
            PackageFormat::Sparse => {
                if self.encoded.len() < MIN_SPARSE_LENGTH {
                    return Err(EncodingError::InvalidPackage("invalid encoded data".into()));
                }
                if self.token.is_empty() {
                    return Err(EncodingError::InvalidPackage("invalid sparse token".into()));
                }
                if self.compressed {
                    if self.encoded.len() < MIN_COMPRESSED_LENGTH {
                        return Err(EncodingError::InvalidPackage(
                            "invalid compressed encoded data".into(),
                        ));
                    }
                } else if self.encoded[0] != b'{' {
                    return Err(EncodingError::InvalidPackage("invalid encoded data".into()));
                }
            }
        }
        Ok(())
    }

    /// Rejects packages written by a newer implementation.
    fn check_version(&self) -> EncodingResult<()> {
        if self.version.is_empty() {
            return Err(EncodingError::InvalidPackage("version required".into()));
        }
        let version = Version::parse(&self.version)
            .map_err(|e| EncodingError::InvalidPackage(format!("invalid version: {e}")))?;
        let current = Version::parse(PACKAGE_VERSION)
            .map_err(|e| EncodingError::InvalidPackage(format!("invalid version: {e}")))?;
        if version > current {
            return Err(EncodingError::UnsupportedVersion(self.version.clone()));
        }
        Ok(())
    }
}

/// Builds and serializes a valid package for storage. The format is
/// derived from the encoded data: a non-trivial side-car makes the
/// package sparse.
pub fn encode_package(
    encoder_id: &str,
    token: &str,
    cipher: Vec<u8>,
    encoded: Vec<u8>,
    compressed: bool,
) -> EncodingResult<Vec<u8>> {
    if encoder_id.is_empty() {
        return Err(EncodingError::InvalidPackage("encoder id required".into()));
    }
    let format = if encoded.len() >= MIN_SPARSE_LENGTH {
        PackageFormat::Sparse
    } else {
        PackageFormat::Secure
    };
    let package = Package {
        version: PACKAGE_VERSION.to_string(),
        format,
        compressed,
        encoder_id: encoder_id.to_string(),
        token: token.to_string(),
        cipher,
        encoded,
    };
    package.validate()?;
    Ok(bincode::serialize(&package)?)
}

/// Deserializes and validates a stored package.
pub fn decode_package(data: &[u8]) -> EncodingResult<Package> {
    let package: Package = bincode::deserialize(data)?;
    package.check_version()?;
    package.validate()?;
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse_package() -> Package {
        Package {
            version: PACKAGE_VERSION.to_string(),
            format: PackageFormat::Sparse,
            compressed: false,
            encoder_id: "ab12cd34".into(),
            token: "cfab12cd34".into(),
            cipher: vec![1, 2, 3, 4, 5],
            encoded: b"{\"a\":1}".to_vec(),
        }
    }

    #[test]
    fn valid_sparse_package() {
        assert!(sparse_package().validate().is_ok());
    }

    #[test]
    fn secure_package_must_have_empty_encoded() {
        let mut p = sparse_package();
        p.format = PackageFormat::Secure;
        assert!(p.validate().is_err());
        p.encoded.clear();
        p.token.clear();
        assert!(p.validate().is_ok());
    }

    #[test]
    fn sparse_package_requires_token() {
        let mut p = sparse_package();
        p.token.clear();
        assert!(p.validate().is_err());
    }

    #[test]
    fn sparse_encoded_must_look_like_json() {
        let mut p = sparse_package();
        p.encoded = b"not-json".to_vec();
        assert!(p.validate().is_err());
    }

    #[test]
    fn short_cipher_is_rejected() {
        let mut p = sparse_package();
        p.cipher = vec![1, 2];
        assert!(p.validate().is_err());
    }

    #[test]
    fn compressed_cipher_has_a_higher_floor() {
        let mut p = sparse_package();
        p.compressed = true;
        p.cipher = vec![1, 2, 3, 4, 5];
        p.encoded = vec![0; 16];
        assert!(p.validate().is_err());
        p.cipher = vec![0; 8];
        assert!(p.validate().is_ok());
    }

    #[test]
    fn bad_version_is_rejected() {
        let mut p = sparse_package();
        p.version = "one-point-oh".into();
        assert!(p.validate().is_err());
        p.version.clear();
        assert!(p.validate().is_err());
    }
}
