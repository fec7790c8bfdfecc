//! Argon2id password hashing for users and operators.

use crate::common::errors::{ApiError, ApiResult};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hash a plaintext password into a PHC string
pub fn hash_password(plain: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ApiError::Internal {
            message: format!("password hashing failed: {err}"),
        })
}

/// Well-formed Argon2id hash with the default parameters that no password matches
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// A stored hash that cannot be parsed never matches
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Runs Argon2 whether or not an account was found, so a missing account costs
/// the same as a wrong password.
pub fn verify_account_password(plain: &str, stored_hash: Option<&str>) -> bool {
    match stored_hash {
        Some(hash) => verify_password(plain, hash),
        None => {
            let _ = verify_password(plain, DUMMY_HASH);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_argon2id_and_salted() {
        let first = hash_password("s3cret").unwrap();
        let second = hash_password("s3cret").unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!verify_password("s3cret", "s3cret"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn test_missing_account_still_runs_argon2() {
        let parsed = PasswordHash::new(DUMMY_HASH).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(parsed.hash.is_some());
        assert!(!verify_password("", DUMMY_HASH));
        assert!(!verify_password("s3cret", DUMMY_HASH));

        assert!(!verify_account_password("s3cret", None));
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_account_password("s3cret", Some(&hash)));
        assert!(!verify_account_password("wrong", Some(&hash)));
    }
}
