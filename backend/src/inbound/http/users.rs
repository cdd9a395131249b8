//! Account and session handlers.
//!
//! ```text
//! POST /api/v1/register {"username":"kody","password":"twixrox","redirectTo":"/jokes/new"}
//! POST /api/v1/login    {"username":"kody","password":"twixrox"}
//! POST /api/v1/logout
//! GET  /api/v1/users/me
//! ```
//!
//! Successful register and login respond `303 See Other` with the session
//! cookie attached; the `Location` is the caller's `redirectTo` when it is a
//! local path and `/jokes` otherwise.

use std::ops::ControlFlow;

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    ApiResult, Denial, Error, LOGIN_PATH, LoginCredentials, LoginValidationError, RedirectTarget,
    ResolvedUser, SessionDirective, User, UserId, ValidationFailure,
};
use crate::inbound::http::outcome::{denial_to_error, redirect, safe_redirect, split};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Landing page after register or login when no usable `redirectTo` is given.
pub const DEFAULT_LANDING_PATH: &str = "/jokes";

/// Body of `POST /register` and `POST /login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    #[schema(example = "kody")]
    pub username: String,
    #[schema(example = "twixrox")]
    pub password: String,
    /// Local path to continue to after authenticating.
    #[serde(default)]
    #[schema(example = "/jokes/new")]
    pub redirect_to: Option<String>,
}

/// Public view of an account. The password digest never leaves the server.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(value_type = String, example = "kody")]
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            username: user.username().as_str().to_owned(),
            created_at: user.created_at(),
        }
    }
}

fn parse_credentials(request: &CredentialsRequest) -> ApiResult<LoginCredentials> {
    LoginCredentials::try_from_parts(&request.username, &request.password)
        .map_err(|err| blank_field_error(&request.username, &err))
}

fn blank_field_error(username: &str, err: &LoginValidationError) -> Error {
    let mut failure = ValidationFailure::default();
    failure.field_errors.insert(err.field(), err.to_string());
    failure
        .fields
        .insert("username".to_owned(), username.to_owned());
    denial_to_error(Denial::Invalid(failure))
}

fn authenticated_redirect(
    state: &HttpState,
    directive: &SessionDirective,
    redirect_to: Option<&str>,
) -> HttpResponse {
    let target = RedirectTarget::to(safe_redirect(redirect_to, DEFAULT_LANDING_PATH));
    let mut builder = redirect(&target);
    state.cookie.apply(&mut builder, directive);
    builder.finish()
}

fn logged_out_redirect(state: &HttpState, directive: &SessionDirective) -> HttpResponse {
    let mut builder = redirect(&RedirectTarget::to(LOGIN_PATH));
    state.cookie.apply(&mut builder, directive);
    builder.finish()
}

/// Create an account and start a session for it.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = CredentialsRequest,
    responses(
        (status = 303, description = "Registered; session cookie set", headers(
            ("Set-Cookie" = String, description = "Session cookie"),
            ("Location" = String, description = "Post-registration destination")
        )),
        (status = 400, description = "Blank username or password", body = ErrorSchema),
        (status = 409, description = "Username already taken", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let credentials = parse_credentials(&request)?;
    let user = match split(state.registration.register(&credentials).await?)? {
        ControlFlow::Continue(user) => user,
        ControlFlow::Break(response) => return Ok(response),
    };
    let directive = session.issue(user.id())?;
    Ok(authenticated_redirect(
        &state,
        &directive,
        request.redirect_to.as_deref(),
    ))
}

/// Authenticate and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = CredentialsRequest,
    responses(
        (status = 303, description = "Login success; session cookie set", headers(
            ("Set-Cookie" = String, description = "Session cookie"),
            ("Location" = String, description = "Post-login destination")
        )),
        (status = 400, description = "Blank username or password", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let credentials = parse_credentials(&request)?;
    let Some(user) = state.login.login(&credentials).await? else {
        return Err(Error::unauthorized("invalid credentials"));
    };
    let directive = session.issue(user.id())?;
    info!(user_id = %user.id(), "user logged in");
    Ok(authenticated_redirect(
        &state,
        &directive,
        request.redirect_to.as_deref(),
    ))
}

/// End the session and send the client to the login page.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 303, description = "Session cookie cleared", headers(
            ("Set-Cookie" = String, description = "Expired session cookie"),
            ("Location" = String, description = "Login page")
        ))
    ),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    if let Some(user_id) = session.user_id() {
        info!(user_id = %user_id, "user logged out");
    }
    let directive = session.destroy();
    logged_out_redirect(&state, &directive)
}

/// The account behind the current session.
///
/// A session naming a user that no longer exists is cleared and redirected
/// to the login page.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 303, description = "Stale session cleared; log in again"),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    match session.resolve_user(state.users.as_ref()).await? {
        ResolvedUser::Authenticated(user) => Ok(HttpResponse::Ok().json(UserResponse::from(&user))),
        ResolvedUser::Anonymous => Err(denial_to_error(Denial::Unauthorized)),
        ResolvedUser::ForcedLogout => Ok(logged_out_redirect(&state, &SessionDirective::Discard)),
    }
}

#[cfg(test)]
mod tests;
