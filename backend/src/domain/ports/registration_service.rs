//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Outcome, User};

/// Domain use-case port for creating accounts.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register a new user.
    ///
    /// A taken username yields [`crate::domain::Denial::Conflict`]; only
    /// store or hashing faults are errors.
    async fn register(&self, credentials: &LoginCredentials) -> Result<Outcome<User>, Error>;
}
