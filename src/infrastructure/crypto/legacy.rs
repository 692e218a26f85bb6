//! Legacy unsalted SHA-256 password digests
//!
//! The user table stored `hex(sha256(utf8(password)))` before it moved to
//! bcrypt. These digests are still recognised when checking stored hashes.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of the password
pub fn sha256_hex(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Verify a password against a legacy digest (hex case is ignored)
pub fn verify(password: &str, digest: &str) -> bool {
    sha256_hex(password).eq_ignore_ascii_case(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digests() {
        assert_eq!(
            sha256_hex("admin123"),
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
        assert_eq!(
            sha256_hex("staff123"),
            "10176e7b7b24d317acfcf8d2064cfd2f24e154f7b5a96603077d5ef813d6a6b6"
        );
    }

    #[test]
    fn test_verify_ignores_case() {
        let digest = sha256_hex("agent123").to_uppercase();
        assert!(verify("agent123", &digest));
        assert!(!verify("agent124", &digest));
    }
}
