use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding the configured database URI, so
/// deployments can keep credentials out of the config file.
const DB_URI_VAR: &str = "BALLOT_ROLL_DB_URI";

/// Application configuration, derived from `BallotRoll.toml` and
/// `BALLOT_ROLL_*` environment variables.
#[derive(Debug, Deserialize)]
pub struct Config {
    db_uri: String,
    db_name: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file `{path}`: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file `{path}`: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl Config {
    /// Load the config from the given TOML file, applying any environment
    /// overrides on top.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Config =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        if let Ok(db_uri) = std::env::var(DB_URI_VAR) {
            config.db_uri = db_uri;
        }
        Ok(config)
    }

    /// URI of the MongoDB deployment holding the roll.
    /// Configured via `db_uri` or `BALLOT_ROLL_DB_URI`.
    pub fn db_uri(&self) -> &str {
        &self.db_uri
    }

    /// Name of the database holding the roll collection.
    /// Configured via `db_name`.
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}
