//! Authentication and registration input types.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Plaintext passwords are held in [`Zeroizing`] buffers so they are wiped
//! when the request finishes.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress, UserValidationError};

/// Domain error returned when login or registration payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Email was missing or malformed.
    Email(UserValidationError),
    /// Display name was missing or malformed (registration only).
    DisplayName(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) | Self::DisplayName(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Validated login credentials used by the authentication service.
///
/// ## Invariants
/// - `email` passed [`EmailAddress`] validation (trimmed, shaped like an
///   address).
/// - `password` is non-empty but otherwise retains caller-provided
///   whitespace to avoid surprising credential comparisons.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let email = EmailAddress::new(email).map_err(CredentialValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address used for the user lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    display_name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl RegistrationRequest {
    /// Construct a registration request from raw form inputs.
    pub fn try_from_parts(
        display_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let display_name =
            DisplayName::new(display_name).map_err(CredentialValidationError::DisplayName)?;
        let email = EmailAddress::new(email).map_err(CredentialValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            display_name,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Display name for the new account.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Unique login email for the new account.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password to be hashed before storage.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialValidationError::Email(UserValidationError::EmptyEmail))]
    #[case("   ", "pw", CredentialValidationError::Email(UserValidationError::EmptyEmail))]
    #[case("not-an-email", "pw", CredentialValidationError::Email(UserValidationError::InvalidEmail))]
    #[case("ann@x.com", "", CredentialValidationError::EmptyPassword)]
    fn invalid_login_inputs(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ann@x.com  ", "secret")]
    #[case("alice@example.com", "correct horse battery staple")]
    fn valid_credentials_trim_email(#[case] email: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(email, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.email().as_ref(), email.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    #[case("", "ann@x.com", "pw")]
    #[case("Ann", "ann@", "pw")]
    #[case("Ann", "ann@x.com", "")]
    fn invalid_registration_inputs(
        #[case] name: &str,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        RegistrationRequest::try_from_parts(name, email, password)
            .expect_err("invalid inputs must fail");
    }

    #[test]
    fn registration_preserves_password_whitespace() {
        let request = RegistrationRequest::try_from_parts("Ann", "ann@x.com", " pw 123 ")
            .expect("valid request");
        assert_eq!(request.password(), " pw 123 ");
    }
}
