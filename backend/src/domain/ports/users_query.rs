//! Driving port for user lookups.
//!
//! The session manager resolves session ids through this port without
//! importing persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a user by id; `None` when no such user exists.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error>;
}
