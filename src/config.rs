use std::env;

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub mongodb_uri: Option<String>,
    pub database: String,
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mongodb_uri: None,
            database: "OpenSplit".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match non_empty("OPENSPLIT_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "OPENSPLIT_PORT",
                value,
            })?,
            None => defaults.port,
        };

        Ok(Config {
            mongodb_uri: non_empty("MONGODB_URI"),
            database: non_empty("OPENSPLIT_DATABASE").unwrap_or(defaults.database),
            host: non_empty("OPENSPLIT_HOST").unwrap_or(defaults.host),
            port,
            cors_origin: non_empty("OPENSPLIT_CORS_ORIGIN"),
        })
    }
}
