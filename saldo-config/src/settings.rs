use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::RateTable;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("saldo.db"),
        }
    }
}

/// Root settings, loaded from a TOML file with `SALDO_`-prefixed environment
/// overrides layered on top (e.g. `SALDO_DATABASE__PATH`).
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseSettings,
    pub rates: RateTable,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("SALDO").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
