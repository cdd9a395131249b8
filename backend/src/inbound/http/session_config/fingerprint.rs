//! Session secret fingerprinting for operational visibility.
//!
//! A truncated SHA-256 of each secret is logged on startup so operators can
//! confirm rotation state without exposing key material.

use sha2::{Digest, Sha256};

use crate::domain::{SessionSecret, SessionSecrets};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// First 8 bytes of the secret's SHA-256, as 16 lowercase hex characters.
///
/// # Examples
///
/// ```rust
/// use jokes::domain::SessionSecret;
/// use jokes::inbound::http::session_config::fingerprint::secret_fingerprint;
///
/// let fp = secret_fingerprint(&SessionSecret::new("correct horse battery staple"));
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn secret_fingerprint(secret: &SessionSecret) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

/// Fingerprints for every configured secret, newest first.
#[must_use]
pub fn secrets_fingerprints(secrets: &SessionSecrets) -> Vec<String> {
    secrets.iter().map(secret_fingerprint).collect()
}
