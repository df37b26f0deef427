// config
use std::env;

use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DbConfig {
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode=disable",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub db: DbConfig,
    pub external_api_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).unwrap_or_default();
        let port = |key: &str, default: u16| match lookup(key) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("{}={:?} is not a valid port, using {}", key, raw, default);
                default
            }),
            None => default,
        };

        let config = Config {
            api: ApiConfig {
                base_url: text("API_BASE_URL"),
                port: port("API_PORT", 8080),
            },
            db: DbConfig {
                host: text("DB_HOST"),
                port: port("DB_PORT", 5432),
                user: text("DB_USER"),
                password: text("DB_PASSWORD"),
                name: text("DB_NAME"),
            },
            external_api_url: text("EXTERNAL_API_URL"),
        };

        // Log which keys are configured, never their values
        let configured: Vec<&str> = [
            ("API_BASE_URL", config.api.base_url.as_str()),
            ("DB_HOST", config.db.host.as_str()),
            ("DB_USER", config.db.user.as_str()),
            ("DB_PASSWORD", config.db.password.as_str()),
            ("DB_NAME", config.db.name.as_str()),
            ("EXTERNAL_API_URL", config.external_api_url.as_str()),
        ]
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, _)| *k)
        .collect();
        info!("Config keys set: {:?}", configured);

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.db.port, 5432);
        assert!(config.db.host.is_empty());
        assert!(config.external_api_url.is_empty());
    }

    #[test]
    fn bad_port_falls_back_to_default() {
        let config = config_from(&[("API_PORT", "eighty"), ("DB_PORT", "6543")]);
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.db.port, 6543);
    }

    #[test]
    fn builds_postgres_url() {
        let config = config_from(&[
            ("DB_HOST", "db"),
            ("DB_USER", "music"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "library"),
        ]);
        assert_eq!(
            config.db.connection_url(),
            "postgres://music:secret@db:5432/library?sslmode=disable"
        );
    }
}
