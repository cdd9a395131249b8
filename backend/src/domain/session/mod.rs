//! Signed, stateless sessions.
//!
//! Tokens live client-side and carry a single `userId` claim. Nothing is
//! stored server-side, so logout is a client instruction rather than a
//! revocation.

use std::time::Duration;

mod codec;
mod manager;
mod secrets;

pub use codec::{SessionClaims, SessionCodec, SessionCodecError};
pub use manager::{ResolvedUser, SessionDirective, SessionManager};
pub use secrets::{SessionSecret, SessionSecrets, SessionSecretsError};

/// Lifetime of an issued session.
pub const SESSION_MAX_AGE: Duration = Duration::from_secs(30 * 24 * 60 * 60);
