//! Session cookie plumbing for HTTP handlers.
//!
//! [`SessionContext`] reads the `jokes_session` cookie and delegates every
//! decision to [`SessionManager`]. Handlers turn the manager's
//! [`SessionDirective`] values back into cookies with
//! [`SessionCookieConfig::apply`].

use std::sync::Arc;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{FromRequest, HttpRequest, HttpResponseBuilder, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::error;

use crate::domain::ports::UsersQuery;
use crate::domain::{
    Error, Outcome, ResolvedUser, SessionDirective, SessionManager, UserId,
};
use crate::inbound::http::state::HttpState;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "jokes_session";

/// Attributes shared by every session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCookieConfig {
    /// Whether the cookie carries the `Secure` attribute.
    pub secure: bool,
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self { secure: true }
    }
}

impl SessionCookieConfig {
    /// Cookie implementing `directive`.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    ///
    /// use jokes::domain::SessionDirective;
    /// use jokes::inbound::http::session::SessionCookieConfig;
    ///
    /// let cookie = SessionCookieConfig { secure: true }.cookie(&SessionDirective::Persist {
    ///     token: "abc".to_owned(),
    ///     max_age: Duration::from_secs(60),
    /// });
    /// assert_eq!(cookie.name(), "jokes_session");
    /// assert_eq!(cookie.http_only(), Some(true));
    /// ```
    pub fn cookie(&self, directive: &SessionDirective) -> Cookie<'static> {
        let (value, max_age) = match directive {
            SessionDirective::Persist { token, max_age } => (
                token.clone(),
                CookieDuration::seconds(i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX)),
            ),
            SessionDirective::Discard => (String::new(), CookieDuration::ZERO),
        };
        Cookie::build(SESSION_COOKIE_NAME, value)
            .path("/")
            .secure(self.secure)
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(max_age)
            .finish()
    }

    /// Attach the cookie for `directive` to a response under construction.
    pub fn apply(&self, builder: &mut HttpResponseBuilder, directive: &SessionDirective) {
        builder.cookie(self.cookie(directive));
    }
}

/// Session token carried by the request plus the manager that interprets it.
#[derive(Clone)]
pub struct SessionContext {
    token: Option<String>,
    manager: Arc<SessionManager>,
}

impl SessionContext {
    pub fn new(token: Option<String>, manager: Arc<SessionManager>) -> Self {
        Self { token, manager }
    }

    /// Raw token presented by the client.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Authenticated user id, if the token is valid.
    pub fn user_id(&self) -> Option<UserId> {
        self.manager.current_user_id(self.token())
    }

    /// Demand a session, redirecting to login with `fallback` as the return
    /// path otherwise.
    pub fn require_user_id(&self, fallback: &str) -> Outcome<UserId> {
        self.manager.require_user_id(self.token(), fallback)
    }

    /// Start a session for `user_id`.
    pub fn issue(&self, user_id: &UserId) -> Result<SessionDirective, Error> {
        self.manager.issue(user_id)
    }

    /// End the session.
    pub fn destroy(&self) -> SessionDirective {
        self.manager.destroy(self.token())
    }

    /// Resolve the session against the user store.
    pub async fn resolve_user(&self, users: &dyn UsersQuery) -> Result<ResolvedUser, Error> {
        self.manager.resolve_user(self.token(), users).await
    }
}

impl FromRequest for SessionContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            error!("HttpState missing from application data");
            return ready(Err(Error::internal("session state unavailable")));
        };
        let token = req
            .cookie(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value().to_owned())
            .filter(|value| !value.is_empty());
        ready(Ok(Self::new(token, state.session.clone())))
    }
}
