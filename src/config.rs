use std::fmt;
use std::path::PathBuf;

use crate::constants::{LOG_PATH_ENV, METRICS_PORT_ENV, NOTION_API_KEY_ENV, NOTION_DATABASE_ENV};
use crate::error::ConfigError;

/// Process configuration, loaded once at startup and passed to each component.
#[derive(Clone)]
pub struct Config {
    pub log_path: PathBuf,
    pub notion_api_key: String,
    pub sessions_database_id: String,
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_path = get(LOG_PATH_ENV);
        let notion_api_key = get(NOTION_API_KEY_ENV);
        let sessions_database_id = get(NOTION_DATABASE_ENV);

        let (log_path, notion_api_key, sessions_database_id) =
            match (log_path, notion_api_key, sessions_database_id) {
                (Some(path), Some(key), Some(db)) => (path, key, db),
                (path, key, db) => {
                    let missing = [
                        (LOG_PATH_ENV, path.is_none()),
                        (NOTION_API_KEY_ENV, key.is_none()),
                        (NOTION_DATABASE_ENV, db.is_none()),
                    ]
                    .into_iter()
                    .filter_map(|(name, absent)| absent.then_some(name))
                    .collect();
                    return Err(ConfigError::Missing(missing));
                }
            };

        let metrics_port = match get(METRICS_PORT_ENV) {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: METRICS_PORT_ENV,
                reason: format!("'{}' is not a port number: {}", raw, e),
            })?),
            None => None,
        };

        Ok(Self {
            log_path: PathBuf::from(log_path),
            notion_api_key,
            sessions_database_id,
            metrics_port,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("log_path", &self.log_path)
            .field("notion_api_key", &"<redacted>")
            .field("sessions_database_id", &self.sessions_database_id)
            .field("metrics_port", &self.metrics_port)
            .finish()
    }
}
