use rand::rngs::OsRng;
use rand::RngCore;

/// Default salt length in bytes.
pub const SALT_LENGTH: usize = 32;

/// Default nonce length in bytes (GCM standard).
pub const NONCE_LENGTH: usize = 12;

/// Returns a buffer of `len` bytes from the OS random source.
pub fn make_rand(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Returns a fresh random salt of [`SALT_LENGTH`] bytes.
pub fn make_salt() -> Vec<u8> {
    make_rand(SALT_LENGTH)
}

/// Returns a fresh random nonce of [`NONCE_LENGTH`] bytes.
pub fn make_nonce() -> Vec<u8> {
    make_rand(NONCE_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_rand_fills_requested_length() {
        for len in [0, 1, 12, 16, 32, 64] {
            assert_eq!(make_rand(len).len(), len);
        }
    }

    #[test]
    fn successive_salts_differ() {
        assert_ne!(make_salt(), make_salt());
    }
}
