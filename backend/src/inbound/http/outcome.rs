//! Translation of domain [`Outcome`] values into HTTP responses.
//!
//! Redirects become `303 See Other` with a `Location` header; denials become
//! [`Error`] payloads so they share the error envelope and status mapping.

use std::ops::ControlFlow;

use actix_web::http::header;
use actix_web::{HttpResponse, HttpResponseBuilder};
use url::form_urlencoded;

use crate::domain::{ApiResult, Denial, Error, Outcome, RedirectTarget, ValidationFailure};

/// Query parameter carrying the post-login return path.
pub const REDIRECT_TO_PARAM: &str = "redirectTo";

/// Map a denial to the error envelope.
///
/// # Examples
/// ```
/// use jokes::domain::{Denial, ErrorCode};
/// use jokes::inbound::http::outcome::denial_to_error;
///
/// let err = denial_to_error(Denial::NotFound { message: "no such joke id 7".into() });
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "no such joke id 7");
/// ```
pub fn denial_to_error(denial: Denial) -> Error {
    match denial {
        Denial::Unauthorized => Error::unauthorized("authentication required"),
        Denial::Forbidden { reason } => Error::forbidden(reason),
        Denial::NotFound { message } => Error::not_found(message),
        Denial::Invalid(failure) => {
            with_failure_details(Error::invalid_request("validation failed"), &failure)
        }
        Denial::Conflict(failure) => {
            let message = failure
                .field_errors
                .iter()
                .next()
                .map_or("request conflicts with existing state", |(_, message)| message)
                .to_owned();
            with_failure_details(Error::conflict(message), &failure)
        }
    }
}

fn with_failure_details(error: Error, failure: &ValidationFailure) -> Error {
    match serde_json::to_value(failure) {
        Ok(details) => error.with_details(details),
        Err(err) => Error::internal(format!("failed to encode validation details: {err}")),
    }
}

/// `Location` value for a redirect target.
///
/// # Examples
/// ```
/// use jokes::domain::RedirectTarget;
/// use jokes::inbound::http::outcome::location;
///
/// assert_eq!(location(&RedirectTarget::login("/jokes/new")), "/login?redirectTo=%2Fjokes%2Fnew");
/// assert_eq!(location(&RedirectTarget::to("/jokes")), "/jokes");
/// ```
pub fn location(target: &RedirectTarget) -> String {
    match target.redirect_to() {
        Some(redirect_to) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair(REDIRECT_TO_PARAM, redirect_to)
                .finish();
            format!("{}?{query}", target.path())
        }
        None => target.path().to_owned(),
    }
}

/// Start a `303 See Other` response towards `target`.
pub fn redirect(target: &RedirectTarget) -> HttpResponseBuilder {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, location(target)));
    builder
}

/// Resolve an outcome into a response, rendering data with `on_data`.
pub fn respond<T>(
    outcome: Outcome<T>,
    on_data: impl FnOnce(T) -> HttpResponse,
) -> ApiResult<HttpResponse> {
    match outcome {
        Outcome::Data(value) => Ok(on_data(value)),
        Outcome::Redirect(target) => Ok(redirect(&target).finish()),
        Outcome::Denied(denial) => Err(denial_to_error(denial)),
    }
}

/// Continue with the data of `outcome`, or break with the response that
/// ends the request.
///
/// Lets handlers chain several outcome-returning steps without nesting.
pub fn split<T>(outcome: Outcome<T>) -> ApiResult<ControlFlow<HttpResponse, T>> {
    match outcome {
        Outcome::Data(value) => Ok(ControlFlow::Continue(value)),
        Outcome::Redirect(target) => Ok(ControlFlow::Break(redirect(&target).finish())),
        Outcome::Denied(denial) => Err(denial_to_error(denial)),
    }
}

/// Accept `candidate` only when it is a local path.
///
/// Protocol-relative (`//host`) and absolute URLs fall back to `default`.
///
/// # Examples
/// ```
/// use jokes::inbound::http::outcome::safe_redirect;
///
/// assert_eq!(safe_redirect(Some("/jokes/new"), "/jokes"), "/jokes/new");
/// assert_eq!(safe_redirect(Some("//evil.example"), "/jokes"), "/jokes");
/// assert_eq!(safe_redirect(None, "/jokes"), "/jokes");
/// ```
pub fn safe_redirect(candidate: Option<&str>, default: &str) -> String {
    match candidate {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_owned()
        }
        _ => default.to_owned(),
    }
}
