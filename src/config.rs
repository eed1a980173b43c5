//! Process configuration loaded from the environment.
//!
//! The receiver is configured entirely through environment variables so it
//! can run unmodified in containers and local shells:
//!
//! - `WEBHOOK_SECRET` (required) - shared secret for signature verification.
//!   The process refuses to start without it rather than run unauthenticated.
//! - `PORT` (optional, default 3000) - TCP port to listen on.
//! - `WEBHOOK_LEDGER_CAPACITY` (optional, default 1000) - maximum number of
//!   delivery IDs retained for deduplication. Must be greater than zero.

use thiserror::Error;

use crate::ledger::DEFAULT_LEDGER_CAPACITY;

/// Environment variable holding the shared webhook secret.
pub const ENV_SECRET: &str = "WEBHOOK_SECRET";

/// Environment variable holding the listen port.
pub const ENV_PORT: &str = "PORT";

/// Environment variable holding the delivery ledger capacity.
pub const ENV_LEDGER_CAPACITY: &str = "WEBHOOK_LEDGER_CAPACITY";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The shared secret is absent or empty. Fatal at startup.
    #[error("WEBHOOK_SECRET environment variable is not set")]
    MissingSecret,

    /// An optional variable was present but could not be parsed.
    #[error("invalid {0} value: {1:?}")]
    InvalidValue(&'static str, String),
}

/// Runtime configuration for the webhook receiver.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret used to verify delivery signatures.
    pub secret: Vec<u8>,

    /// TCP port the server listens on.
    pub port: u16,

    /// Capacity of the delivery deduplication ledger.
    pub ledger_capacity: usize,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] if `WEBHOOK_SECRET` is unset or
    /// empty, and [`ConfigError::InvalidValue`] if `PORT` or
    /// `WEBHOOK_LEDGER_CAPACITY` cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable source.
    ///
    /// Split out from [`Config::from_env`] so tests can supply variables
    /// without mutating the process environment.
    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = get(ENV_SECRET)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)?
            .into_bytes();

        let port = match get(ENV_PORT) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue(ENV_PORT, raw))?,
            None => DEFAULT_PORT,
        };

        let ledger_capacity = match get(ENV_LEDGER_CAPACITY) {
            Some(raw) => {
                let capacity = raw
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidValue(ENV_LEDGER_CAPACITY, raw.clone()))?;
                if capacity == 0 {
                    return Err(ConfigError::InvalidValue(ENV_LEDGER_CAPACITY, raw));
                }
                capacity
            }
            None => DEFAULT_LEDGER_CAPACITY,
        };

        Ok(Config {
            secret,
            port,
            ledger_capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn missing_secret_is_fatal() {
        let result = config_from(&[]);
        assert_eq!(result.unwrap_err(), ConfigError::MissingSecret);
    }

    #[test]
    fn empty_secret_is_fatal() {
        let result = config_from(&[(ENV_SECRET, "")]);
        assert_eq!(result.unwrap_err(), ConfigError::MissingSecret);
    }

    #[test]
    fn defaults_applied() {
        let config = config_from(&[(ENV_SECRET, "abc")]).unwrap();
        assert_eq!(config.secret, b"abc");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.ledger_capacity, DEFAULT_LEDGER_CAPACITY);
    }

    #[test]
    fn overrides_applied() {
        let config = config_from(&[
            (ENV_SECRET, "abc"),
            (ENV_PORT, "8080"),
            (ENV_LEDGER_CAPACITY, "50"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.ledger_capacity, 50);
    }

    #[test]
    fn invalid_port_rejected() {
        let result = config_from(&[(ENV_SECRET, "abc"), (ENV_PORT, "not-a-port")]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ENV_PORT, "not-a-port".to_string())
        );
    }

    #[test]
    fn zero_capacity_rejected() {
        let result = config_from(&[(ENV_SECRET, "abc"), (ENV_LEDGER_CAPACITY, "0")]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ENV_LEDGER_CAPACITY, "0".to_string())
        );
    }
}
