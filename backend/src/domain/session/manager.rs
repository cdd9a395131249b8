//! Session lifecycle: issue, read, require, resolve, destroy.
//!
//! The manager never touches transport types. It produces
//! [`SessionDirective`] values that inbound adapters turn into cookies.

use std::time::Duration;

use tracing::{debug, warn};

use super::{SESSION_MAX_AGE, SessionClaims, SessionCodec};
use crate::domain::ports::UsersQuery;
use crate::domain::{Error, Outcome, RedirectTarget, User, UserId};

/// What the client should do with its session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionDirective {
    /// Store `token` for `max_age`.
    Persist { token: String, max_age: Duration },
    /// Forget any stored token.
    Discard,
}

/// Result of resolving the session to a stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedUser {
    /// No valid session.
    Anonymous,
    /// The session names an existing user.
    Authenticated(User),
    /// The session names a user that no longer resolves; the client must be
    /// logged out.
    ForcedLogout,
}

/// Issues and validates session tokens.
pub struct SessionManager {
    codec: SessionCodec,
}

impl SessionManager {
    /// Wrap a configured codec.
    pub fn new(codec: SessionCodec) -> Self {
        Self { codec }
    }

    /// Underlying codec.
    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// User id carried by a valid token, if any.
    pub fn current_user_id(&self, token: Option<&str>) -> Option<UserId> {
        token
            .and_then(|raw| self.codec.decode(raw))
            .and_then(|claims| claims.user_id)
    }

    /// Demand an authenticated user, redirecting to login otherwise.
    ///
    /// `fallback` is the path the caller was trying to reach; it rides along
    /// as `redirectTo` so login can send the user back.
    pub fn require_user_id(&self, token: Option<&str>, fallback: &str) -> Outcome<UserId> {
        match self.current_user_id(token) {
            Some(user_id) => Outcome::Data(user_id),
            None => Outcome::Redirect(RedirectTarget::login(fallback)),
        }
    }

    /// Start a session for `user_id`.
    pub fn issue(&self, user_id: &UserId) -> Result<SessionDirective, Error> {
        let token = self
            .codec
            .encode(&SessionClaims::for_user(*user_id))
            .map_err(|err| Error::internal(format!("failed to issue session: {err}")))?;
        debug!(user_id = %user_id, "session issued");
        Ok(SessionDirective::Persist {
            token,
            max_age: SESSION_MAX_AGE,
        })
    }

    /// End the session. Tokens are not tracked server-side, so destruction
    /// only instructs the client to discard its copy.
    pub fn destroy(&self, token: Option<&str>) -> SessionDirective {
        if let Some(user_id) = self.current_user_id(token) {
            debug!(user_id = %user_id, "session destroyed");
        }
        SessionDirective::Discard
    }

    /// Resolve the session to a stored user.
    ///
    /// A valid token whose user id no longer exists yields
    /// [`ResolvedUser::ForcedLogout`]. Store faults propagate as errors.
    pub async fn resolve_user<Q>(&self, token: Option<&str>, users: &Q) -> Result<ResolvedUser, Error>
    where
        Q: UsersQuery + ?Sized,
    {
        let Some(user_id) = self.current_user_id(token) else {
            return Ok(ResolvedUser::Anonymous);
        };
        match users.find_user(&user_id).await? {
            Some(user) => Ok(ResolvedUser::Authenticated(user)),
            None => {
                warn!(user_id = %user_id, "session references unknown user; forcing logout");
                Ok(ResolvedUser::ForcedLogout)
            }
        }
    }
}
