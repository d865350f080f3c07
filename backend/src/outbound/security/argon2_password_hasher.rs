//! Argon2-backed implementation of the `PasswordHasher` port.
//!
//! Digests are PHC strings (`$argon2id$...`) embedding the salt and
//! parameters, so verification needs no side table and parameter upgrades
//! can roll out gradually as users log in.

use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use password_hash::{PasswordHash, SaltString};

use crate::domain::ports::{PasswordHasher, PasswordHasherError};

const SALT_LEN: usize = 16;

/// Argon2id password hasher with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHasherError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        getrandom::getrandom(&mut salt_bytes)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;

        let digest = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        Ok(digest.to_string())
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordHasherError> {
        let parsed = PasswordHash::new(digest)
            .map_err(|err| PasswordHasherError::invalid_digest(err.to_string()))?;

        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            // A mismatch is a negative answer, not a failure.
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHasherError::verification(err.to_string())),
        }
    }
}
