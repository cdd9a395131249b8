//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    JokeRepository, JokesCommand, JokesQuery, LoginService, PasswordHasher, RegistrationService,
    UserRepository, UsersQuery,
};
use crate::domain::{AuthService, JokeService, SessionManager};
use crate::inbound::http::session::SessionCookieConfig;

/// Parameter object bundling the driving ports used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub users: Arc<dyn UsersQuery>,
    pub jokes: Arc<dyn JokesQuery>,
    pub jokes_command: Arc<dyn JokesCommand>,
}

impl HttpStatePorts {
    /// Wire the domain services over the given driven adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use jokes::inbound::http::state::HttpStatePorts;
    /// use jokes::outbound::memory::{InMemoryJokeRepository, InMemoryUserRepository};
    /// use jokes::outbound::security::BcryptPasswordHasher;
    /// use mockable::DefaultClock;
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let ports = HttpStatePorts::from_repositories(
    ///     Arc::new(InMemoryUserRepository::new(clock.clone())),
    ///     Arc::new(InMemoryJokeRepository::new(clock)),
    ///     Arc::new(BcryptPasswordHasher::default()),
    /// );
    /// let _jokes = ports.jokes.clone();
    /// ```
    pub fn from_repositories(
        users: Arc<dyn UserRepository>,
        jokes: Arc<dyn JokeRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        let auth = Arc::new(AuthService::new(users, hasher));
        let jokes = Arc::new(JokeService::new(jokes));
        Self {
            login: auth.clone(),
            registration: auth.clone(),
            users: auth,
            jokes: jokes.clone(),
            jokes_command: jokes,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub users: Arc<dyn UsersQuery>,
    pub jokes: Arc<dyn JokesQuery>,
    pub jokes_command: Arc<dyn JokesCommand>,
    pub session: Arc<SessionManager>,
    pub cookie: SessionCookieConfig,
}

impl HttpState {
    /// Construct state from the ports bundle and session configuration.
    pub fn new(
        ports: HttpStatePorts,
        session: Arc<SessionManager>,
        cookie: SessionCookieConfig,
    ) -> Self {
        let HttpStatePorts {
            login,
            registration,
            users,
            jokes,
            jokes_command,
        } = ports;
        Self {
            login,
            registration,
            users,
            jokes,
            jokes_command,
            session,
            cookie,
        }
    }
}
