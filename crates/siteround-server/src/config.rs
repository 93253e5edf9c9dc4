//! Server configuration, assembled from environment variables over
//! built-in defaults.

use siteround_auth::AuthConfig;
use siteround_db::DbConfig;

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: String,
    pub db: DbConfig,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".into(),
            db: DbConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

fn env_override(target: &mut String, key: &str) {
    if let Ok(value) = std::env::var(key) {
        *target = value;
    }
}

impl ServerConfig {
    /// Build a configuration from `SITEROUND_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        env_override(&mut config.bind_addr, "SITEROUND_ADDR");
        env_override(&mut config.db.url, "SITEROUND_DB_URL");
        env_override(&mut config.db.namespace, "SITEROUND_DB_NAMESPACE");
        env_override(&mut config.db.database, "SITEROUND_DB_DATABASE");
        env_override(&mut config.db.username, "SITEROUND_DB_USERNAME");
        env_override(&mut config.db.password, "SITEROUND_DB_PASSWORD");
        env_override(
            &mut config.auth.jwt_private_key_pem,
            "SITEROUND_JWT_PRIVATE_KEY_PEM",
        );
        env_override(
            &mut config.auth.jwt_public_key_pem,
            "SITEROUND_JWT_PUBLIC_KEY_PEM",
        );
        env_override(&mut config.auth.jwt_issuer, "SITEROUND_JWT_ISSUER");

        if let Ok(pepper) = std::env::var("SITEROUND_PASSWORD_PEPPER") {
            config.auth.pepper = Some(pepper);
        }
        if let Ok(raw) = std::env::var("SITEROUND_SESSION_LIFETIME_SECS") {
            if let Ok(secs) = raw.parse() {
                config.auth.session_lifetime_secs = secs;
            }
        }

        config
    }
}
