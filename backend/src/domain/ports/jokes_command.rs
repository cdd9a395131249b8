//! Driving port for joke mutations. Callers must already be authenticated.

use async_trait::async_trait;

use crate::domain::{Error, Joke, JokeId, Outcome, UserId};

/// Domain use-case port for creating and deleting jokes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JokesCommand: Send + Sync {
    /// Validate and store a joke owned by `owner`.
    ///
    /// Invalid input yields [`crate::domain::Denial::Invalid`] carrying every
    /// failing field.
    async fn create(&self, owner: &UserId, name: &str, content: &str)
    -> Result<Outcome<Joke>, Error>;

    /// Delete a joke on behalf of `actor`.
    ///
    /// A missing joke is `NotFound` regardless of who asks; an existing joke
    /// owned by someone else is `Forbidden`.
    async fn delete(&self, actor: &UserId, id: &JokeId) -> Result<Outcome<()>, Error>;
}
