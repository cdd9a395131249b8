//! Authenticator: login, registration, and user lookups.
//!
//! Backs the [`LoginService`], [`RegistrationService`] and [`UsersQuery`]
//! driving ports with a [`UserRepository`] and a [`PasswordHasher`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, RegistrationService, UserPersistenceError,
    UserRepository, UsersQuery,
};
use crate::domain::{
    Denial, Error, LoginCredentials, NewUser, Outcome, User, UserId, ValidationFailure,
};

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::conflict(format!("username already registered: {username}"))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Authentication service over a credential store.
pub struct AuthService<U: ?Sized, H: ?Sized> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U: ?Sized, H: ?Sized> AuthService<U, H> {
    /// Create a service from a user repository and a password hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl<U, H> LoginService for AuthService<U, H>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<Option<User>, Error> {
        let Some(user) = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_repository_error)?
        else {
            debug!(username = %credentials.username(), "login for unknown username");
            return Ok(None);
        };

        if !self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
        {
            debug!(user_id = %user.id(), "login with wrong password");
            return Ok(None);
        }

        Ok(Some(user))
    }
}

#[async_trait]
impl<U, H> RegistrationService for AuthService<U, H>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    async fn register(&self, credentials: &LoginCredentials) -> Result<Outcome<User>, Error> {
        let password_hash = self
            .hasher
            .hash(credentials.password())
            .await
            .map_err(map_hash_error)?;
        let new_user = NewUser {
            username: credentials.username().clone(),
            password_hash,
        };

        match self.users.create(&new_user).await {
            Ok(user) => {
                info!(user_id = %user.id(), "user registered");
                Ok(Outcome::Data(user))
            }
            Err(UserPersistenceError::DuplicateUsername { username }) => {
                debug!(%username, "registration rejected: username taken");
                Ok(Outcome::Denied(Denial::Conflict(ValidationFailure::single(
                    "username",
                    &username,
                    format!("User with username {username} already exists"),
                ))))
            }
            Err(error) => Err(map_repository_error(error)),
        }
    }
}

#[async_trait]
impl<U, H> UsersQuery for AuthService<U, H>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
{
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_repository_error)
    }
}
