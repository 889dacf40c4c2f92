//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use yamdb::inbound::http::token_config::TokenKeyConfig;
use yamdb::outbound::persistence::DbPool;
use yamdb::settings::AppSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) token_key: TokenKeyConfig,
    pub(crate) settings: AppSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration from loaded settings and key material.
    #[must_use]
    pub fn new(token_key: TokenKeyConfig, settings: AppSettings, bind_addr: SocketAddr) -> Self {
        Self {
            token_key,
            settings,
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one the server keeps all state in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
