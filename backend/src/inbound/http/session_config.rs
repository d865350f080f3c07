//! Session configuration parsing and validation.
//!
//! Centralises the environment-driven session settings so they are validated
//! consistently and can be tested in isolation via `mockable::Env`.
//!
//! Recognised variables:
//! - `SESSION_KEY_FILE`: path to the cookie signing key (>= 64 bytes).
//! - `SESSION_ALLOW_EPHEMERAL`: accept a generated throwaway key (dev only).
//! - `SESSION_COOKIE_SECURE`: mark the cookie `Secure` (default on).
//! - `SESSION_SAMESITE`: `Strict` | `Lax` | `None` (default `Lax`).
//! - `SESSION_TTL_SECONDS`: session lifetime. When absent, cookies live for
//!   the browser session with no server-side expiry — a deliberately weak
//!   default carried over from the platform's origins and worth overriding
//!   in production.

use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const TTL_ENV: &str = "SESSION_TTL_SECONDS";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Session settings derived from configuration toggles.
pub struct SessionSettings {
    /// Signing key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
    /// Session lifetime; `None` keeps browser-session cookies alive
    /// indefinitely.
    pub ttl: Option<Duration>,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("key", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .field("same_site", &self.same_site)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie setting.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, SessionConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(SessionConfigError::InvalidEnv {
            name,
            value: value.to_owned(),
            expected: BOOL_EXPECTED,
        }),
    }
}

fn load_key<E: Env>(env: &E) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );
    let allow_ephemeral = match env.string(ALLOW_EPHEMERAL_ENV) {
        Some(value) => parse_bool(ALLOW_EPHEMERAL_ENV, &value)?,
        None => cfg!(debug_assertions),
    };

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            if bytes.len() < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length: bytes.len(),
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(source) if allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

/// Build session settings from environment variables.
///
/// # Errors
///
/// Returns [`SessionConfigError`] when a toggle is malformed, the key file
/// is unreadable without the ephemeral fallback, or the combination of
/// toggles is insecure.
pub fn session_settings_from_env<E: Env>(env: &E) -> Result<SessionSettings, SessionConfigError> {
    let key = load_key(env)?;

    let cookie_secure = match env.string(COOKIE_SECURE_ENV) {
        Some(value) => parse_bool(COOKIE_SECURE_ENV, &value)?,
        None => true,
    };

    let same_site = match env.string(SAMESITE_ENV).as_deref() {
        None => SameSite::Lax,
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "strict" => SameSite::Strict,
            "lax" => SameSite::Lax,
            "none" => SameSite::None,
            _ => {
                return Err(SessionConfigError::InvalidEnv {
                    name: SAMESITE_ENV,
                    value: value.to_owned(),
                    expected: SAMESITE_EXPECTED,
                });
            }
        },
    };

    if same_site == SameSite::None && !cookie_secure {
        return Err(SessionConfigError::InsecureSameSiteNone);
    }

    let ttl = match env.string(TTL_ENV) {
        None => None,
        Some(value) => {
            let seconds: u64 =
                value
                    .parse()
                    .map_err(|_| SessionConfigError::InvalidEnv {
                        name: TTL_ENV,
                        value,
                        expected: "a positive number of seconds",
                    })?;
            Some(Duration::from_secs(seconds))
        }
    };
    if ttl.is_none() {
        warn!("no SESSION_TTL_SECONDS configured; sessions will not expire server-side");
    }

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl,
    })
}
