pub mod catalog;
pub mod datamall;

use crate::datamall::QueryPoint;
use crate::error::ConfigError;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

pub const ENV_VAR_PREFIX: &str = "BICYCLE_PARKING_";
pub const API_KEY_ENV_VAR: &str = "LTA_API_KEY";
pub const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub datamall: DatamallConfig,
    pub output: OutputConfig,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct DatamallConfig {
    pub base_url: String,
    pub account_key: Option<String>,
    pub page_size: u32,
    pub max_pages: u32,
    pub request_delay_ms: u64,
    /// Replaces the built-in query point grid when set.
    pub query_points: Option<Vec<QueryPoint>>,
}

impl DatamallConfig {
    pub fn account_key(&self) -> Result<&str, ConfigError> {
        match self.account_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingCredential),
        }
    }
}

impl Default for DatamallConfig {
    fn default() -> Self {
        Self {
            base_url: datamall::BICYCLE_PARKING_ENDPOINT.to_string(),
            account_key: None,
            page_size: datamall::PAGE_SIZE,
            max_pages: 20,
            request_delay_ms: 100,
            query_points: None,
        }
    }
}

// Keeps the credential out of `config = ?config` log lines.
impl std::fmt::Debug for DatamallConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatamallConfig")
            .field("base_url", &self.base_url)
            .field("account_key", &self.account_key.as_ref().map(|_| "<redacted>"))
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("request_delay_ms", &self.request_delay_ms)
            .field("query_points", &self.query_points)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub path: String,
    pub user_submitted_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "src/data/bicycle-parking.json".to_string(),
            user_submitted_path: "src/data/user-submitted.json".to_string(),
        }
    }
}

pub fn config_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(SETTINGS_FILE))
        .merge(Env::prefixed(ENV_VAR_PREFIX).split("__"))
        .merge(
            Env::raw()
                .only(&[API_KEY_ENV_VAR])
                .map(|_| "datamall.account_key".into()),
        )
}

pub fn load_config() -> Result<Config, ConfigError> {
    Ok(config_figment().extract::<Config>()?)
}

pub mod error {
    use thiserror::Error;
    use tracing::dispatcher::SetGlobalDefaultError;

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("failed to load configuration: {0}")]
        Figment(#[from] figment::Error),
        #[error("missing DataMall credential: set the {} environment variable", crate::API_KEY_ENV_VAR)]
        MissingCredential,
    }

    #[derive(Debug, Error)]
    pub enum InitializationError {
        #[error(transparent)]
        Tracing(#[from] SetGlobalDefaultError),
        #[error(transparent)]
        Config(#[from] ConfigError),
    }
}
