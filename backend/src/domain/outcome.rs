//! Tagged results for operations that may redirect or deny.
//!
//! Redirects and denials are ordinary values, not errors. Services return
//! `Result<Outcome<T>, Error>` where the `Err` arm is reserved for faults
//! (store outages, hashing failures) and every expected refusal is a
//! [`Denial`].

use std::collections::BTreeMap;

use serde::Serialize;

/// Path of the login flow used for redirects.
pub const LOGIN_PATH: &str = "/login";

/// Per-field validation messages keyed by input field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Record a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Message recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }
}

/// Field errors plus the submitted values, echoed back for re-display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub field_errors: FieldErrors,
    pub fields: BTreeMap<String, String>,
}

impl ValidationFailure {
    /// Single-field failure echoing the same field.
    pub fn single(field: &str, value: &str, message: impl Into<String>) -> Self {
        let mut failure = Self::default();
        failure.field_errors.insert(field, message);
        failure.fields.insert(field.to_owned(), value.to_owned());
        failure
    }
}

/// Where an unauthenticated caller should be sent.
///
/// `redirect_to` is the path the caller was trying to reach; the login flow
/// returns there after authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    path: String,
    redirect_to: Option<String>,
}

impl RedirectTarget {
    /// Redirect to the login flow, remembering `redirect_to`.
    ///
    /// # Examples
    /// ```
    /// use jokes::domain::RedirectTarget;
    ///
    /// let target = RedirectTarget::login("/jokes/new");
    /// assert_eq!(target.path(), "/login");
    /// assert_eq!(target.redirect_to(), Some("/jokes/new"));
    /// ```
    pub fn login(redirect_to: impl Into<String>) -> Self {
        Self {
            path: LOGIN_PATH.to_owned(),
            redirect_to: Some(redirect_to.into()),
        }
    }

    /// Plain redirect with no return path.
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            redirect_to: None,
        }
    }

    /// Destination path.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Path to return to after the destination flow completes.
    pub fn redirect_to(&self) -> Option<&str> {
        self.redirect_to.as_deref()
    }
}

/// Expected refusal of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// No authenticated identity where one is required.
    Unauthorized,
    /// Authenticated, but not allowed to act on the resource.
    Forbidden { reason: String },
    /// The referenced resource does not exist.
    NotFound { message: String },
    /// Input failed validation.
    Invalid(ValidationFailure),
    /// Input collides with existing state.
    Conflict(ValidationFailure),
}

/// Result of an operation that can succeed, redirect, or be denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Data(T),
    Redirect(RedirectTarget),
    Denied(Denial),
}

impl<T> Outcome<T> {
    /// Transform the success value, leaving redirects and denials intact.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Data(value) => Outcome::Data(f(value)),
            Self::Redirect(target) => Outcome::Redirect(target),
            Self::Denied(denial) => Outcome::Denied(denial),
        }
    }

    /// Success value, if any.
    pub fn data(self) -> Option<T> {
        match self {
            Self::Data(value) => Some(value),
            Self::Redirect(_) | Self::Denied(_) => None,
        }
    }

    /// Shorthand for a not-found denial.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Denied(Denial::NotFound {
            message: message.into(),
        })
    }

    /// Shorthand for a forbidden denial.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Denied(Denial::Forbidden {
            reason: reason.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn map_only_touches_data() {
        assert_eq!(Outcome::Data(2).map(|v| v * 2), Outcome::Data(4));
        let redirect: Outcome<i32> = Outcome::Redirect(RedirectTarget::login("/jokes"));
        assert_eq!(
            redirect.map(|v| v * 2),
            Outcome::Redirect(RedirectTarget::login("/jokes"))
        );
        let denied: Outcome<i32> = Outcome::not_found("gone");
        assert_eq!(denied.clone().map(|v| v * 2), Outcome::not_found("gone"));
        assert_eq!(denied.data(), None);
    }

    #[rstest]
    fn validation_failure_serialises_field_errors_and_fields() {
        let failure = ValidationFailure::single("username", "kody", "taken");
        let value = serde_json::to_value(&failure).expect("serialise failure");
        assert_eq!(
            value,
            json!({
                "fieldErrors": { "username": "taken" },
                "fields": { "username": "kody" }
            })
        );
    }

    #[rstest]
    fn plain_redirect_has_no_return_path() {
        let target = RedirectTarget::to(LOGIN_PATH);
        assert_eq!(target.path(), "/login");
        assert!(target.redirect_to().is_none());
    }
}
