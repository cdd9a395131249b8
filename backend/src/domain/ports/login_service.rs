//! Driving port for login use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing the backing infrastructure.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Return the matching user, or `None` when the username is unknown or
    /// the password is wrong. The two cases are deliberately indistinguishable.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Option<User>, Error>;
}
