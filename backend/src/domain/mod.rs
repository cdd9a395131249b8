//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed entities for users, sessions and jokes,
//! plus the services that implement the driving ports. Nothing here knows
//! about HTTP or SQL; adapters live under `inbound` and `outbound`.
//!
//! Public surface:
//! - Error / ErrorCode: fault payload and stable identifier.
//! - Outcome / Denial / RedirectTarget: expected, non-fault results.
//! - User / Joke and their identifiers.
//! - SessionManager / SessionCodec: signed session tokens.
//! - AuthService / JokeService: driving port implementations.

pub mod access;
pub mod auth;
pub mod auth_service;
pub mod error;
pub mod joke;
pub mod joke_service;
pub mod outcome;
pub mod ports;
pub mod session;
pub mod trace_id;
pub mod user;

pub use self::access::{Owned, can_mutate, can_read};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode};
pub use self::joke::{
    JOKE_CONTENT_MIN, JOKE_NAME_MIN, Joke, JokeDraft, JokeId, JokeSummary, NewJoke,
};
pub use self::joke_service::{JokeService, RandomOffset, ThreadRngOffset};
pub use self::outcome::{
    Denial, FieldErrors, LOGIN_PATH, Outcome, RedirectTarget, ValidationFailure,
};
pub use self::session::{
    ResolvedUser, SESSION_MAX_AGE, SessionClaims, SessionCodec, SessionCodecError,
    SessionDirective, SessionManager, SessionSecret, SessionSecrets, SessionSecretsError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{NewUser, PasswordHash, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use jokes::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
