//! Driving port for joke reads. Reads are open to anonymous callers.

use async_trait::async_trait;

use crate::domain::{Error, Joke, JokeId, JokeSummary};

/// Domain use-case port for reading jokes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JokesQuery: Send + Sync {
    /// Most recent jokes first, truncated to `limit`.
    async fn list(&self, limit: usize) -> Result<Vec<JokeSummary>, Error>;

    /// Fetch one joke; `None` when absent.
    async fn get_by_id(&self, id: &JokeId) -> Result<Option<Joke>, Error>;

    /// Uniformly random joke; `None` when the store is empty.
    async fn get_random(&self) -> Result<Option<Joke>, Error>;
}
