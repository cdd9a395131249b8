//! Process-local stores used when no database URL is configured.
//!
//! Each store guards its rows with a single mutex that is never held across
//! an await point. Data is lost on restart.

mod joke_repository;
mod user_repository;

pub use joke_repository::InMemoryJokeRepository;
pub use user_repository::InMemoryUserRepository;

const POISONED: &str = "in-memory store lock poisoned";
