//! Environment-based server configuration.

use anyhow::Context;
use stagedoor_auth::AuthConfig;
use stagedoor_db::DbConfig;

/// Full server configuration, read from `STAGEDOOR_*` environment
/// variables.
#[derive(Debug)]
pub struct ServerConfig {
    pub auth: AuthConfig,
    pub db: DbConfig,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// `STAGEDOOR_JWT_SECRET` is required — tokens signed with a
    /// default secret would be forgeable, so startup aborts without
    /// it. Everything else falls back to local-development defaults.
    pub fn load() -> anyhow::Result<Self> {
        let token_secret =
            std::env::var("STAGEDOOR_JWT_SECRET").context("STAGEDOOR_JWT_SECRET must be set")?;

        let token_lifetime_secs = match std::env::var("STAGEDOOR_TOKEN_LIFETIME_SECS") {
            Ok(raw) => raw
                .parse()
                .context("STAGEDOOR_TOKEN_LIFETIME_SECS must be an integer")?,
            Err(_) => AuthConfig::default().token_lifetime_secs,
        };

        let auth = AuthConfig {
            token_secret,
            token_lifetime_secs,
            pepper: std::env::var("STAGEDOOR_PASSWORD_PEPPER").ok(),
        };

        let defaults = DbConfig::default();
        let db = DbConfig {
            url: env_or("STAGEDOOR_DB_URL", &defaults.url),
            namespace: env_or("STAGEDOOR_DB_NAMESPACE", &defaults.namespace),
            database: env_or("STAGEDOOR_DB_DATABASE", &defaults.database),
            username: env_or("STAGEDOOR_DB_USERNAME", &defaults.username),
            password: env_or("STAGEDOOR_DB_PASSWORD", &defaults.password),
        };

        Ok(Self { auth, db })
    }
}
