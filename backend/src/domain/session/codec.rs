//! Signed session token encoding.
//!
//! Wire format: `base64url(payload) "." base64url(mac)`, both unpadded. The
//! payload is JSON carrying the optional `userId` claim and an `exp` instant
//! in Unix seconds. The MAC is HMAC-SHA256 over the encoded payload text,
//! signed with the newest secret and verified against every secret in turn.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::TimeDelta;
use hmac::{Hmac, Mac};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;

use super::{SESSION_MAX_AGE, SessionSecret, SessionSecrets};
use crate::domain::UserId;

type HmacSha256 = Hmac<Sha256>;

/// Identity claims carried by a session token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: Option<UserId>,
}

impl SessionClaims {
    /// Claims identifying `user_id`.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }
}

/// Errors raised while producing a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionCodecError {
    /// Claims could not be serialised.
    #[error("failed to serialise session claims: {message}")]
    Serialize { message: String },
    /// The signing key was rejected by the MAC.
    #[error("session secret rejected by signer")]
    InvalidKey,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<UserId>,
    exp: i64,
}

/// Encodes and verifies session tokens.
pub struct SessionCodec {
    secrets: SessionSecrets,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl SessionCodec {
    /// Build a codec whose tokens expire after the standard session lifetime.
    pub fn new(secrets: SessionSecrets, clock: Arc<dyn Clock>) -> Self {
        let ttl = TimeDelta::from_std(SESSION_MAX_AGE).unwrap_or(TimeDelta::days(30));
        Self {
            secrets,
            ttl,
            clock,
        }
    }

    /// Override the token lifetime.
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    /// Configured secrets, newest first.
    pub fn secrets(&self) -> &SessionSecrets {
        &self.secrets
    }

    /// Serialise and sign `claims` with the newest secret.
    pub fn encode(&self, claims: &SessionClaims) -> Result<String, SessionCodecError> {
        let payload = TokenPayload {
            user_id: claims.user_id,
            exp: (self.clock.utc() + self.ttl).timestamp(),
        };
        let json = serde_json::to_vec(&payload).map_err(|err| SessionCodecError::Serialize {
            message: err.to_string(),
        })?;
        let encoded = URL_SAFE_NO_PAD.encode(json);
        let mut mac = signer(self.secrets.newest()).ok_or(SessionCodecError::InvalidKey)?;
        mac.update(encoded.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{encoded}.{signature}"))
    }

    /// Verify and parse `token`.
    ///
    /// Returns `None` for anything that is not a well-formed, unexpired token
    /// signed by one of the configured secrets. Failures never surface as
    /// errors: an unreadable token is simply no session.
    pub fn decode(&self, token: &str) -> Option<SessionClaims> {
        let (encoded, signature) = token.split_once('.')?;
        if encoded.is_empty() || signature.is_empty() {
            debug!("session token missing payload or signature");
            return None;
        }
        let Ok(signature) = URL_SAFE_NO_PAD.decode(signature) else {
            debug!("session token signature is not base64url");
            return None;
        };

        if !self.verifies(encoded, &signature) {
            debug!("session token signature matched no configured secret");
            return None;
        }

        let Ok(json) = URL_SAFE_NO_PAD.decode(encoded) else {
            debug!("session token payload is not base64url");
            return None;
        };
        let payload: TokenPayload = match serde_json::from_slice(&json) {
            Ok(payload) => payload,
            Err(error) => {
                debug!(%error, "session token payload is not valid claims");
                return None;
            }
        };
        if payload.exp <= self.clock.utc().timestamp() {
            debug!(exp = payload.exp, "session token expired");
            return None;
        }

        Some(SessionClaims {
            user_id: payload.user_id,
        })
    }

    fn verifies(&self, encoded: &str, signature: &[u8]) -> bool {
        self.secrets.iter().any(|secret| {
            signer(secret).is_some_and(|mut mac| {
                mac.update(encoded.as_bytes());
                mac.verify_slice(signature).is_ok()
            })
        })
    }
}

fn signer(secret: &SessionSecret) -> Option<HmacSha256> {
    HmacSha256::new_from_slice(secret.as_bytes()).ok()
}
