//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use jokes::inbound::http::session_config::SessionSettings;
use jokes::outbound::persistence::DbPool;
use jokes::outbound::security::DEFAULT_BCRYPT_COST;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) bcrypt_cost: u32,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool the server keeps users and jokes in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the bcrypt work factor used for new passwords.
    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
