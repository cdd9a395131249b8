//! Session configuration parsing and validation.
//!
//! Signing secrets and cookie toggles come from the environment through
//! [`mockable::Env`] so the rules can be tested without touching process
//! state. Missing secrets abort startup in every build mode; release builds
//! additionally reject short secrets and implicit cookie settings.

use std::path::PathBuf;

use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::{SessionSecret, SessionSecrets, SessionSecretsError};

use self::parsing::{BoolEnvConfig, parse_bool_env};
use super::session::SessionCookieConfig;

pub mod fingerprint;
mod parsing;

/// Comma-separated signing secrets, newest first.
pub const SECRETS_ENV: &str = "SESSION_SECRETS";
/// File holding one signing secret per line, newest first.
pub const SECRET_FILE_ENV: &str = "SESSION_SECRET_FILE";
/// Whether the session cookie carries the `Secure` attribute.
pub const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
/// Minimum secret length accepted by release builds.
pub const SESSION_SECRET_MIN_LEN: usize = 32;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jokes::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated session settings.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Signing secrets, newest first.
    pub secrets: SessionSecrets,
    /// Cookie attributes applied to every session cookie.
    pub cookie: SessionCookieConfig,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Neither secrets variable is set.
    #[error("no session secret configured; set {SECRETS_ENV} or {SECRET_FILE_ENV}")]
    MissingSecrets,
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secrets file failed.
    #[error("failed to read session secrets at {path}: {source}")]
    SecretFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A secret is too short for release builds.
    #[error("session secret #{position} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        position: usize,
        length: usize,
        min_len: usize,
    },
    /// The secrets list itself is malformed.
    #[error(transparent)]
    Secrets(#[from] SessionSecretsError),
}

/// Build session settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use jokes::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_SECRETS" => Some("0123456789abcdef0123456789abcdef".to_owned()),
///     "SESSION_COOKIE_SECURE" => Some("1".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// assert_eq!(settings.secrets.len(), 1);
/// assert!(settings.cookie.secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let secure = parse_bool_env(env, mode, BoolEnvConfig::new(COOKIE_SECURE_ENV, true))?;
    let secrets = secrets_from_env(env, mode)?;
    Ok(SessionSettings {
        secrets,
        cookie: SessionCookieConfig { secure },
    })
}

fn secrets_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<SessionSecrets, SessionConfigError> {
    let raw = match env.string(SECRETS_ENV).filter(|value| !value.trim().is_empty()) {
        Some(value) => split_secrets(&value, ','),
        None => match env.string(SECRET_FILE_ENV) {
            Some(path) => read_secret_file(PathBuf::from(path))?,
            None => return Err(SessionConfigError::MissingSecrets),
        },
    };

    for (position, secret) in raw.iter().enumerate() {
        check_length(position, secret.len(), mode)?;
    }
    let secrets = raw
        .iter()
        .map(|secret| SessionSecret::new(secret.as_bytes()))
        .collect();
    Ok(SessionSecrets::new(secrets)?)
}

fn split_secrets(value: &str, separator: char) -> Vec<Zeroizing<String>> {
    value
        .split(separator)
        .map(|secret| Zeroizing::new(secret.trim().to_owned()))
        .collect()
}

fn read_secret_file(path: PathBuf) -> Result<Vec<Zeroizing<String>>, SessionConfigError> {
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => Zeroizing::new(contents),
        Err(source) => return Err(SessionConfigError::SecretFileRead { path, source }),
    };
    Ok(split_secrets(contents.trim_end(), '\n'))
}

fn check_length(position: usize, length: usize, mode: BuildMode) -> Result<(), SessionConfigError> {
    if length == 0 || length >= SESSION_SECRET_MIN_LEN {
        return Ok(());
    }
    if mode.is_debug() {
        warn!(
            position,
            length,
            min_len = SESSION_SECRET_MIN_LEN,
            "session secret shorter than release minimum"
        );
        return Ok(());
    }
    Err(SessionConfigError::SecretTooShort {
        position,
        length,
        min_len: SESSION_SECRET_MIN_LEN,
    })
}
