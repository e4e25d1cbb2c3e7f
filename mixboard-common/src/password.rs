//! Password hashing for account credentials
//!
//! Passwords are stored as SHA-256 of salt+password with a per-user random
//! salt, matching the users table schema (password_hash, password_salt).

use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a random 16-byte salt, hex encoded
pub fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Hash a password with the given salt
///
/// Returns 64 lowercase hex characters (SHA-256 of salt+password).
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a candidate password against a stored hash and salt
pub fn verify_password(password: &str, salt: &str, stored_hash: &str) -> bool {
    hash_password(password, salt) == stored_hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salt_is_32_hex_chars() {
        let salt = generate_salt();
        assert_eq!(salt.len(), 32);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_salts_are_unique() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn test_hash_is_deterministic() {
        let hash1 = hash_password("hunter2", "0123abcd");
        let hash2 = hash_password("hunter2", "0123abcd");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_salt_changes_hash() {
        assert_ne!(
            hash_password("hunter2", "aaaa"),
            hash_password("hunter2", "bbbb")
        );
    }

    #[test]
    fn test_verify_accepts_correct_password() {
        let salt = generate_salt();
        let hash = hash_password("correct horse", &salt);
        assert!(verify_password("correct horse", &salt, &hash));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let salt = generate_salt();
        let hash = hash_password("correct horse", &salt);
        assert!(!verify_password("battery staple", &salt, &hash));
    }
}
