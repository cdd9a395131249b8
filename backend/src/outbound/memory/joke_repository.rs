//! In-memory joke store.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use super::POISONED;
use crate::domain::ports::{JokeRepository, JokeRepositoryError};
use crate::domain::{Joke, JokeId, JokeSummary, NewJoke};

/// Jokes kept in recency order.
pub struct InMemoryJokeRepository {
    jokes: Mutex<Vec<Joke>>,
    clock: Arc<dyn Clock>,
}

fn newest_first(a: &Joke, b: &Joke) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
}

impl InMemoryJokeRepository {
    /// Create an empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            jokes: Mutex::new(Vec::new()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Joke>>, JokeRepositoryError> {
        self.jokes
            .lock()
            .map_err(|_| JokeRepositoryError::query(POISONED))
    }
}

#[async_trait]
impl JokeRepository for InMemoryJokeRepository {
    async fn list_recent(&self, limit: usize) -> Result<Vec<JokeSummary>, JokeRepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .take(limit)
            .map(JokeSummary::from)
            .collect())
    }

    async fn count(&self) -> Result<u64, JokeRepositoryError> {
        let len = self.lock()?.len();
        u64::try_from(len).map_err(|err| JokeRepositoryError::query(err.to_string()))
    }

    async fn find_at_offset(&self, offset: u64) -> Result<Option<Joke>, JokeRepositoryError> {
        let Ok(index) = usize::try_from(offset) else {
            return Ok(None);
        };
        Ok(self.lock()?.get(index).cloned())
    }

    async fn find_by_id(&self, id: &JokeId) -> Result<Option<Joke>, JokeRepositoryError> {
        Ok(self.lock()?.iter().find(|joke| &joke.id == id).cloned())
    }

    async fn create(&self, joke: &NewJoke) -> Result<Joke, JokeRepositoryError> {
        let now = self.clock.utc();
        let stored = Joke {
            id: JokeId::random(),
            owner_id: joke.owner_id,
            name: joke.draft.name().to_owned(),
            content: joke.draft.content().to_owned(),
            created_at: now,
            updated_at: now,
        };
        let mut jokes = self.lock()?;
        jokes.push(stored.clone());
        jokes.sort_by(newest_first);
        Ok(stored)
    }

    async fn delete(&self, id: &JokeId) -> Result<bool, JokeRepositoryError> {
        let mut jokes = self.lock()?;
        let before = jokes.len();
        jokes.retain(|joke| &joke.id != id);
        Ok(jokes.len() != before)
    }
}
