//! Port abstraction for one-way password hashing.

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hasher adapters.
    ///
    /// All variants are infrastructure faults. A credential mismatch is NOT
    /// an error: [`PasswordHasher::verify`] reports it as `Ok(false)` so
    /// callers can never confuse a bad password with a broken hasher.
    pub enum PasswordHasherError {
        /// Salting or digest computation failed (e.g. entropy exhaustion).
        Hashing { message: String } => "password hashing failed: {message}",
        /// The stored digest could not be parsed.
        InvalidDigest { message: String } => "stored password digest invalid: {message}",
        /// Verification aborted for a reason other than a mismatch.
        Verification { message: String } => "password verification failed: {message}",
    }
}

/// One-way adaptive password hashing.
///
/// Hashing is CPU-bound and synchronous; adapters must not block on I/O.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted one-way digest of `plaintext`.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHasherError>;

    /// Check `plaintext` against a stored digest.
    ///
    /// Returns `Ok(false)` for a mismatch. `Err` is reserved for
    /// infrastructure failures and must never be conflated with a mismatch
    /// by callers.
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordHasherError>;
}
