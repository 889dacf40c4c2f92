//! Application settings loaded via OrthoConfig.
//!
//! Values layer as defaults, then an optional config file, then `YAMDB_*`
//! environment variables, then command-line flags.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_FROM_EMAIL: &str = "noreply@yamdb.local";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 1440;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Runtime configuration for the server and admin tools.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "YAMDB")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL URL; in-memory storage is used when absent.
    pub database_url: Option<String>,
    /// Sender address on outgoing mail.
    pub from_email: Option<String>,
    /// SMTP relay; mail is logged instead of sent when absent.
    pub smtp_host: Option<String>,
    /// SMTP relay port.
    #[ortho_config(default = 587)]
    pub smtp_port: u16,
    /// SMTP login; used only together with `smtp_password`.
    pub smtp_username: Option<String>,
    /// SMTP password; used only together with `smtp_username`.
    pub smtp_password: Option<String>,
    /// Lifetime of issued access tokens in minutes.
    #[ortho_config(default = 1440)]
    pub token_ttl_minutes: i64,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            database_url: None,
            from_email: None,
            smtp_host: None,
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_username: None,
            smtp_password: None,
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

impl AppSettings {
    /// Return the bind interface, falling back to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the bind port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Return the sender address, falling back to the default mailbox.
    pub fn from_email(&self) -> &str {
        self.from_email.as_deref().unwrap_or(DEFAULT_FROM_EMAIL)
    }

    /// Return the SMTP relay port.
    pub fn smtp_port(&self) -> u16 {
        self.smtp_port
    }

    /// Token lifetime; non-positive values fall back to the default.
    pub fn token_ttl(&self) -> chrono::Duration {
        let minutes = if self.token_ttl_minutes > 0 {
            self.token_ttl_minutes
        } else {
            DEFAULT_TOKEN_TTL_MINUTES
        };
        chrono::Duration::minutes(minutes)
    }

    /// Pool size; zero falls back to the default.
    pub fn db_max_connections(&self) -> u32 {
        if self.db_max_connections > 0 {
            self.db_max_connections
        } else {
            DEFAULT_DB_MAX_CONNECTIONS
        }
    }
}
