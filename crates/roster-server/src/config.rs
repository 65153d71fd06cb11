use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use roster_sync::DEFAULT_STORAGE_KEY;

pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// Server configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: PathBuf,
    pub remote_url: String,
    pub remote_timeout: Duration,
    pub storage_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen_addr = lookup("ROSTER_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::Invalid("ROSTER_LISTEN_ADDR", "must be a valid socket address")
            })?;

        let db_path = lookup("ROSTER_DB_PATH")
            .unwrap_or_else(|| "./roster.redb".to_string())
            .into();

        let remote_url = lookup("ROSTER_REMOTE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REMOTE_URL.to_string());
        if !remote_url.starts_with("http://") && !remote_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "ROSTER_REMOTE_URL",
                "must start with http:// or https://",
            ));
        }

        let remote_timeout_secs = match lookup("ROSTER_REMOTE_TIMEOUT_SECS") {
            Some(s) => s.parse::<u64>().map_err(|_| {
                ConfigError::Invalid("ROSTER_REMOTE_TIMEOUT_SECS", "must be a whole number")
            })?,
            None => 10,
        };

        let storage_key = lookup("ROSTER_STORAGE_KEY")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());

        Ok(Config {
            listen_addr,
            db_path,
            remote_url,
            remote_timeout: Duration::from_secs(remote_timeout_secs),
            storage_key,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid(&'static str, &'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid(var, msg) => write!(f, "Invalid value for {}: {}", var, msg),
        }
    }
}

impl std::error::Error for ConfigError {}
