use std::{env, fmt::Display, str::FromStr};

use tracing::info;

pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// External URL the OAuth providers redirect back to.
    pub base_url: String,
    pub client_secrets_path: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "8080"),
            database_url: try_load("DATABASE_URL", "sqlite://reliefnet.db"),
            base_url: try_load("BASE_URL", "http://localhost:8080"),
            client_secrets_path: try_load("CLIENT_SECRETS_PATH", "client_secret.json"),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| format!("invalid {key}: {e}"))
        .expect("environment misconfigured")
}
