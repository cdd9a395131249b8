//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) expose strongly typed
//! errors so adapters map their failures into predictable variants. Driving
//! ports (`*Service`, `*Query`, `*Command`) speak [`crate::domain::Error`]
//! and [`crate::domain::Outcome`].

mod macros;
pub(crate) use macros::define_port_error;

mod joke_repository;
mod jokes_command;
mod jokes_query;
mod login_service;
mod password_hasher;
mod registration_service;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use joke_repository::MockJokeRepository;
pub use joke_repository::{JokeRepository, JokeRepositoryError};
#[cfg(test)]
pub use jokes_command::MockJokesCommand;
pub use jokes_command::JokesCommand;
#[cfg(test)]
pub use jokes_query::MockJokesQuery;
pub use jokes_query::JokesQuery;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
