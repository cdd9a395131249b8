//! Joke resource service.
//!
//! Reads are open to everyone. Mutations take an already authenticated actor;
//! ownership is checked through [`crate::domain::can_mutate`] after the joke
//! is known to exist, so a missing id reads as `NotFound` for every caller.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, info};

use crate::domain::ports::{JokeRepository, JokeRepositoryError, JokesCommand, JokesQuery};
use crate::domain::{
    Denial, Error, Joke, JokeDraft, JokeId, JokeSummary, NewJoke, Outcome, UserId, can_mutate,
};

/// Picks an offset for random selection.
pub trait RandomOffset: Send + Sync {
    /// Return an offset in `0..count`. Callers guarantee `count > 0`.
    ///
    /// ```rust
    /// use jokes::domain::RandomOffset;
    /// struct Last;
    /// impl RandomOffset for Last {
    ///     fn pick(&self, count: u64) -> u64 {
    ///         count - 1
    ///     }
    /// }
    /// assert_eq!(Last.pick(4), 3);
    /// ```
    fn pick(&self, count: u64) -> u64;
}

/// Uniform offsets from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngOffset;

impl RandomOffset for ThreadRngOffset {
    fn pick(&self, count: u64) -> u64 {
        if count == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..count)
    }
}

fn map_repository_error(error: JokeRepositoryError) -> Error {
    match error {
        JokeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("joke repository unavailable: {message}"))
        }
        JokeRepositoryError::Query { message } => {
            Error::internal(format!("joke repository error: {message}"))
        }
    }
}

fn missing_joke(id: &JokeId) -> String {
    format!("no such joke id {id}")
}

/// Joke use cases over a [`JokeRepository`].
pub struct JokeService<R: ?Sized> {
    repo: Arc<R>,
    offsets: Arc<dyn RandomOffset>,
}

impl<R: ?Sized> JokeService<R> {
    /// Create a service drawing random offsets from the thread RNG.
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_offsets(repo, Arc::new(ThreadRngOffset))
    }

    /// Create a service with an explicit offset source.
    pub fn with_offsets(repo: Arc<R>, offsets: Arc<dyn RandomOffset>) -> Self {
        Self { repo, offsets }
    }
}

#[async_trait]
impl<R> JokesQuery for JokeService<R>
where
    R: JokeRepository + ?Sized,
{
    async fn list(&self, limit: usize) -> Result<Vec<JokeSummary>, Error> {
        self.repo
            .list_recent(limit)
            .await
            .map_err(map_repository_error)
    }

    async fn get_by_id(&self, id: &JokeId) -> Result<Option<Joke>, Error> {
        self.repo.find_by_id(id).await.map_err(map_repository_error)
    }

    async fn get_random(&self) -> Result<Option<Joke>, Error> {
        let count = self.repo.count().await.map_err(map_repository_error)?;
        if count == 0 {
            return Ok(None);
        }
        let offset = self.offsets.pick(count).min(count - 1);
        let joke = self
            .repo
            .find_at_offset(offset)
            .await
            .map_err(map_repository_error)?;
        if joke.is_none() {
            debug!(offset, count, "random joke vanished between count and read");
        }
        Ok(joke)
    }
}

#[async_trait]
impl<R> JokesCommand for JokeService<R>
where
    R: JokeRepository + ?Sized,
{
    async fn create(
        &self,
        owner: &UserId,
        name: &str,
        content: &str,
    ) -> Result<Outcome<Joke>, Error> {
        let draft = match JokeDraft::try_from_parts(name, content) {
            Ok(draft) => draft,
            Err(failure) => return Ok(Outcome::Denied(Denial::Invalid(failure))),
        };
        let joke = self
            .repo
            .create(&NewJoke {
                owner_id: *owner,
                draft,
            })
            .await
            .map_err(map_repository_error)?;
        info!(joke_id = %joke.id, user_id = %owner, "joke created");
        Ok(Outcome::Data(joke))
    }

    async fn delete(&self, actor: &UserId, id: &JokeId) -> Result<Outcome<()>, Error> {
        let Some(joke) = self
            .repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
        else {
            return Ok(Outcome::not_found(missing_joke(id)));
        };

        if !can_mutate(Some(actor), &joke) {
            debug!(joke_id = %id, user_id = %actor, "delete refused for non-owner");
            return Ok(Outcome::forbidden("only the owner may delete this joke"));
        }

        let removed = self
            .repo
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Ok(Outcome::not_found(missing_joke(id)));
        }
        info!(joke_id = %id, user_id = %actor, "joke deleted");
        Ok(Outcome::Data(()))
    }
}

#[cfg(test)]
#[path = "joke_service_tests.rs"]
mod tests;
