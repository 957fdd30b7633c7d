//! Password hashing. Argon2id with library-default cost and a per-hash random salt,
//! stored as a PHC string.

use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;

lazy_static! {
    /// Stands in for the stored hash of an unknown account, with the same cost parameters.
    static ref DUMMY_HASH: String = hash_password("resume-vault-dummy-password").unwrap_or_default();
}

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Two calls with the same input never return the same string.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    match Argon2::default().hash_password(plain.as_bytes(), &salt) {
        Ok(phc) => Ok(phc.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "could not hash password");
            Err(PasswordError::Hash(e.to_string()))
        }
    }
}

/// `Ok(false)` on mismatch; `Err` only when `stored` is not a PHC string.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, PasswordError> {
    let phc = PasswordHash::new(stored).map_err(|e| {
        tracing::error!(error = %e, "stored password hash does not parse");
        PasswordError::MalformedHash(e.to_string())
    })?;
    let matched = Argon2::default()
        .verify_password(plain.as_bytes(), &phc)
        .is_ok();
    Ok(matched)
}

/// Credential check for a login attempt. An unknown account (`None`) still
/// runs a full verify against [`DUMMY_HASH`] and then reports a mismatch.
pub fn verify_login(plain: &str, stored_hash: Option<&str>) -> Result<bool, PasswordError> {
    match stored_hash {
        Some(hash) => verify_password(plain, hash),
        None => {
            let _ = verify_password(plain, &DUMMY_HASH);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_accepts_its_password() {
        let hash = hash_password("Tr0ub4dor&3").unwrap();
        assert!(verify_password("Tr0ub4dor&3", &hash).unwrap());
    }

    #[test]
    fn stored_hash_refuses_other_passwords() {
        let hash = hash_password("Tr0ub4dor&3").unwrap();
        assert!(!verify_password("tr0ub4dor&3", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("hunter2", &a).unwrap());
        assert!(verify_password("hunter2", &b).unwrap());
    }

    #[test]
    fn hash_does_not_contain_plaintext() {
        let hash = hash_password("plain-text-secret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("plain-text-secret"));
    }

    #[test]
    fn unknown_account_pays_same_cost_and_never_matches() {
        let real = PasswordHash::new(&hash_password("x").unwrap())
            .unwrap()
            .params
            .to_string();
        let dummy = PasswordHash::new(&DUMMY_HASH).expect("dummy hash is a valid PHC string");
        assert_eq!(dummy.algorithm.as_str(), "argon2id");
        assert_eq!(dummy.params.to_string(), real);

        assert!(!verify_login("resume-vault-dummy-password", None).unwrap());
        assert!(!verify_login("anything", None).unwrap());
    }

    #[test]
    fn verify_login_checks_known_account() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_login("s3cret", Some(&hash)).unwrap());
        assert!(!verify_login("nope", Some(&hash)).unwrap());
    }

    #[test]
    fn plaintext_or_empty_rows_are_malformed() {
        for stored in ["not-a-valid-hash", ""] {
            let err = verify_password("anything", stored).unwrap_err();
            assert!(matches!(err, PasswordError::MalformedHash(_)), "{stored}");
        }
    }
}
