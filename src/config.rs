//! Application-level configuration: storage backend selection and the in-memory seed data.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};
use validator::Validate;

use crate::dao::models::GameListEntity;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "DSLIST_BACK_CONFIG_PATH";
/// Environment variable naming the storage backend.
const STORAGE_BACKEND_ENV: &str = "STORAGE_BACKEND";

/// Errors raised while reading startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `STORAGE_BACKEND` names a backend this binary does not know.
    #[error("unknown storage backend `{0}` (expected memory, mongo or couch)")]
    UnknownBackend(String),
    /// `STORAGE_BACKEND` names a backend whose cargo feature is disabled.
    #[error("storage backend `{name}` requires the `{feature}` feature")]
    BackendDisabled {
        /// Requested backend.
        name: String,
        /// Cargo feature that would enable it.
        feature: &'static str,
    },
}

/// Storage implementation selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local store seeded from [`AppConfig::seed_lists`].
    Memory,
    /// MongoDB collection configured through `MONGO_URI` / `MONGO_DB`.
    #[cfg(feature = "mongo-store")]
    Mongo,
    /// CouchDB database configured through `COUCH_*` variables.
    #[cfg(feature = "couch-store")]
    Couch,
}

impl StorageBackend {
    /// Read `STORAGE_BACKEND`, defaulting to MongoDB when compiled in.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(STORAGE_BACKEND_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::parse(&value),
            _ => Ok(Self::default()),
        }
    }

    /// Parse a backend name (case-insensitive).
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            #[cfg(feature = "mongo-store")]
            "mongo" | "mongodb" => Ok(Self::Mongo),
            #[cfg(not(feature = "mongo-store"))]
            name @ ("mongo" | "mongodb") => Err(ConfigError::BackendDisabled {
                name: name.to_owned(),
                feature: "mongo-store",
            }),
            #[cfg(feature = "couch-store")]
            "couch" | "couchdb" => Ok(Self::Couch),
            #[cfg(not(feature = "couch-store"))]
            name @ ("couch" | "couchdb") => Err(ConfigError::BackendDisabled {
                name: name.to_owned(),
                feature: "couch-store",
            }),
            _ => Err(ConfigError::UnknownBackend(value.to_owned())),
        }
    }
}

impl Default for StorageBackend {
    fn default() -> Self {
        #[cfg(feature = "mongo-store")]
        {
            Self::Mongo
        }
        #[cfg(not(feature = "mongo-store"))]
        {
            Self::Memory
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    seed_lists: Vec<GameListEntity>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the built-in seed lists.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        count = app_config.seed_lists.len(),
                        "loaded seed game lists from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON document, dropping seed entries that fail validation.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let raw = serde_json::from_str::<RawConfig>(contents)?;
        Ok(raw.into())
    }

    /// Game lists used to populate the in-memory backend.
    pub fn seed_lists(&self) -> &[GameListEntity] {
        &self.seed_lists
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed_lists: default_seed_lists(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    seed_lists: Vec<RawGameList>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let seed_lists = value
            .seed_lists
            .into_iter()
            .filter_map(|raw| match raw.validate() {
                Ok(()) => Some(raw.into()),
                Err(err) => {
                    warn!(id = raw.id, error = %err, "skipping invalid seed game list");
                    None
                }
            })
            .collect();
        Self { seed_lists }
    }
}

#[derive(Debug, Deserialize, Validate)]
/// JSON representation of a single seed game list.
struct RawGameList {
    #[validate(range(min = 1))]
    id: i64,
    #[validate(length(min = 1, max = 80))]
    name: String,
    #[serde(default)]
    game_ids: Vec<i64>,
}

impl From<RawGameList> for GameListEntity {
    fn from(value: RawGameList) -> Self {
        GameListEntity::new(value.id, value.name).with_games(value.game_ids)
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in seed shipped with the binary.
fn default_seed_lists() -> Vec<GameListEntity> {
    vec![
        GameListEntity::new(1, "Aventura e RPG").with_games([1, 2, 3, 4, 5]),
        GameListEntity::new(2, "Jogos de plataforma").with_games([6, 7, 8, 9, 10]),
    ]
}
