//! In-memory credential store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use super::POISONED;
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId, Username};

/// Users keyed by id, with usernames unique across the store.
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserRepository {
    /// Create an empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, User>>, UserPersistenceError> {
        self.users
            .lock()
            .map_err(|_| UserPersistenceError::query(POISONED))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.lock()?;
        if users
            .values()
            .any(|existing| existing.username() == &user.username)
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username.as_str(),
            ));
        }
        let stored = User::new(
            UserId::random(),
            user.username.clone(),
            user.password_hash.clone(),
            self.clock.utc(),
        );
        users.insert(*stored.id(), stored.clone());
        Ok(stored)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()?
            .values()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.get(id).cloned())
    }
}
