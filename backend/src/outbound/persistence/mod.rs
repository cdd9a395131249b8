//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows (`models.rs`, `schema.rs`) and
//! domain types. Connections come from a `bb8` pool through `diesel-async`;
//! migrations run once at startup on a blocking connection.
//!
//! ```ignore
//! use jokes::outbound::persistence::{DbPool, DieselJokeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/jokes")).await?;
//! let jokes = DieselJokeRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_joke_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_joke_repository::DieselJokeRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
