pub mod entities;
pub mod migrator;
pub mod repositories;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseSettings;
use crate::shared::errors::InfraError;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./booking.db?mode=rwc" or "postgres://...")
    pub url: String,
    /// Upper bound on pooled connections
    pub max_open_connections: u32,
    /// Connections kept open once the pool has gone quiet
    pub max_idle_connections: u32,
    /// Idle connections above `max_idle_connections` are closed after this
    pub idle_timeout: Duration,
    /// Connections older than this are closed and replaced
    pub max_lifetime: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::from(&DatabaseSettings::default())
    }
}

impl From<&DatabaseSettings> for DatabaseConfig {
    fn from(settings: &DatabaseSettings) -> Self {
        Self {
            url: settings.url.clone(),
            max_open_connections: settings.max_open_connections,
            max_idle_connections: settings.max_idle_connections,
            idle_timeout: Duration::from_secs(settings.idle_timeout_secs),
            max_lifetime: Duration::from_secs(settings.max_lifetime_secs),
        }
    }
}

impl DatabaseConfig {
    /// Single-connection in-memory SQLite, for tests.
    pub fn sqlite_in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_open_connections: 1,
            max_idle_connections: 1,
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(3600),
        }
    }

    /// URL with any password replaced, safe for logs.
    pub fn redacted_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                let creds = &self.url[scheme_end + 3..at];
                match creds.split_once(':') {
                    Some((user, _)) => format!(
                        "{}{}:****{}",
                        &self.url[..scheme_end + 3],
                        user,
                        &self.url[at..]
                    ),
                    None => self.url.clone(),
                }
            }
            _ => self.url.clone(),
        }
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url.clone());
        opt.max_connections(self.max_open_connections)
            .min_connections(self.max_idle_connections)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .sqlx_logging(false);
        opt
    }
}

/// Initialize the connection pool
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, InfraError> {
    info!(
        url = %config.redacted_url(),
        max_open = config.max_open_connections,
        max_idle = config.max_idle_connections,
        idle_timeout_secs = config.idle_timeout.as_secs(),
        max_lifetime_secs = config.max_lifetime.as_secs(),
        "Connecting to database"
    );
    let db = Database::connect(config.connect_options()).await?;
    db.ping().await?;
    info!("Database connected successfully");
    Ok(db)
}
