//! Port abstraction for joke persistence adapters.
//!
//! Ordering contract shared by `list_recent` and `find_at_offset`: newest
//! `created_at` first, ties broken by id descending, so offsets address a
//! stable sequence between calls.

use async_trait::async_trait;

use crate::domain::{Joke, JokeId, JokeSummary, NewJoke};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by joke repository adapters.
    pub enum JokeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "joke repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "joke repository query failed: {message}",
    }
}

/// Joke store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JokeRepository: Send + Sync {
    /// Most recent jokes, at most `limit` of them.
    async fn list_recent(&self, limit: usize) -> Result<Vec<JokeSummary>, JokeRepositoryError>;

    /// Number of stored jokes.
    async fn count(&self) -> Result<u64, JokeRepositoryError>;

    /// Joke at zero-based `offset` in recency order, if that many exist.
    async fn find_at_offset(&self, offset: u64) -> Result<Option<Joke>, JokeRepositoryError>;

    /// Fetch a joke by identifier.
    async fn find_by_id(&self, id: &JokeId) -> Result<Option<Joke>, JokeRepositoryError>;

    /// Insert a new joke, assigning its id and timestamps.
    async fn create(&self, joke: &NewJoke) -> Result<Joke, JokeRepositoryError>;

    /// Delete a joke. Returns whether a row was removed.
    async fn delete(&self, id: &JokeId) -> Result<bool, JokeRepositoryError>;
}
