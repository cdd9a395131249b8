//! Builders for HTTP state ports backed by Diesel or process memory.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;
use tracing::warn;

use jokes::domain::ports::{JokeRepository, PasswordHasher, UserRepository};
use jokes::domain::{SessionCodec, SessionManager};
use jokes::inbound::http::state::{HttpState, HttpStatePorts};
use jokes::outbound::memory::{InMemoryJokeRepository, InMemoryUserRepository};
use jokes::outbound::persistence::{DbPool, DieselJokeRepository, DieselUserRepository};
use jokes::outbound::security::BcryptPasswordHasher;

use super::ServerConfig;

/// Pick repository adapters: Diesel when a pool is configured, otherwise
/// in-memory stores that vanish with the process.
fn build_repositories(
    pool: Option<&DbPool>,
    clock: &Arc<dyn Clock>,
) -> (Arc<dyn UserRepository>, Arc<dyn JokeRepository>) {
    match pool {
        Some(pool) => (
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselJokeRepository::new(pool.clone())),
        ),
        None => {
            warn!("no database configured; accounts and jokes are kept in memory only");
            (
                Arc::new(InMemoryUserRepository::new(clock.clone())),
                Arc::new(InMemoryJokeRepository::new(clock.clone())),
            )
        }
    }
}

/// Build the shared HTTP state for every worker.
pub(super) fn build_http_state(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> web::Data<HttpState> {
    let (users, jokes) = build_repositories(config.db_pool.as_ref(), &clock);
    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost));
    let ports = HttpStatePorts::from_repositories(users, jokes, hasher);
    let session = Arc::new(SessionManager::new(SessionCodec::new(
        config.session.secrets.clone(),
        clock,
    )));
    web::Data::new(HttpState::new(ports, session, config.session.cookie))
}
