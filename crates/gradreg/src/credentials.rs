//! Student credential handling.
//!
//! A student whose credential column is unset (or holds a short legacy
//! value) authenticates with their external student code; once they set a
//! secret it is stored as `salt$sha256hex`. The stored-length check is how
//! legacy unset values are told apart from hashes.

use rand::Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Stored values longer than this are hashes; anything shorter is treated
/// as unset.
const HASHED_MIN_LEN: usize = 21;

/// Minimum length for a newly chosen secret.
pub const MIN_SECRET_LEN: usize = 6;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    #[error("New secret must be at least {MIN_SECRET_LEN} characters")]
    TooShort,

    #[error("Current secret does not match")]
    WrongCurrent,
}

fn digest(salt: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hashes a secret with a fresh random salt into the stored form.
pub fn hash_secret(secret: &str) -> String {
    let salt: [u8; 16] = rand::thread_rng().gen();
    let salt = hex::encode(salt);
    let digest = digest(&salt, secret);
    format!("{}${}", salt, digest)
}

/// Verifies an attempt against a stored `salt$digest` value.
pub fn verify_hash(stored: &str, attempt: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, attempt) == expected,
        None => false,
    }
}

/// Verifies a student's login attempt. With no stored hash the secret
/// defaults to the external student code.
pub fn verify_student_secret(stored: Option<&str>, student_code: &str, attempt: &str) -> bool {
    match stored {
        Some(s) if s.len() >= HASHED_MIN_LEN => verify_hash(s, attempt),
        _ => attempt == student_code,
    }
}

/// Validates a secret change and returns the new stored value. The current
/// secret must verify (against the hash, or the student code fallback) and
/// the new one must meet the length floor.
pub fn change_secret(
    stored: Option<&str>,
    student_code: &str,
    current: &str,
    new: &str,
) -> Result<String, CredentialError> {
    if new.len() < MIN_SECRET_LEN {
        return Err(CredentialError::TooShort);
    }
    if !verify_student_secret(stored, student_code, current) {
        return Err(CredentialError::WrongCurrent);
    }
    Ok(hash_secret(new))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let stored = hash_secret("hunter2!");
        assert!(stored.len() >= HASHED_MIN_LEN);
        assert!(verify_hash(&stored, "hunter2!"));
        assert!(!verify_hash(&stored, "hunter3!"));
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_secret("same"), hash_secret("same"));
    }

    #[test]
    fn test_unset_secret_falls_back_to_student_code() {
        assert!(verify_student_secret(None, "M2026001", "M2026001"));
        assert!(!verify_student_secret(None, "M2026001", "wrong"));
        // Short legacy values behave as unset.
        assert!(verify_student_secret(Some("legacy"), "M2026001", "M2026001"));
    }

    #[test]
    fn test_hashed_secret_overrides_fallback() {
        let stored = hash_secret("chosen-secret");
        assert!(verify_student_secret(Some(&stored), "M2026001", "chosen-secret"));
        // The code no longer works once a secret is set.
        assert!(!verify_student_secret(Some(&stored), "M2026001", "M2026001"));
    }

    #[test]
    fn test_change_secret() {
        let stored = change_secret(None, "M2026001", "M2026001", "new-secret").unwrap();
        assert!(verify_hash(&stored, "new-secret"));

        let again = change_secret(Some(&stored), "M2026001", "new-secret", "newer-secret").unwrap();
        assert!(verify_hash(&again, "newer-secret"));
    }

    #[test]
    fn test_change_secret_rejects_short() {
        assert_eq!(
            change_secret(None, "M1", "M1", "abc"),
            Err(CredentialError::TooShort)
        );
    }

    #[test]
    fn test_change_secret_rejects_wrong_current() {
        let stored = hash_secret("right");
        assert_eq!(
            change_secret(Some(&stored), "M1", "wrong!", "long-enough"),
            Err(CredentialError::WrongCurrent)
        );
    }
}
