//! RON configuration for the metafetch binary.
//!
//! Every section is optional; anything left out falls back to the defaults
//! below. The Douban API key can also come from `METAFETCH_DOUBAN_APIKEY`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use metafetch_core::MessageBundle;
use metafetch_engine::{
    DoubanClient, EngineConfig, FetchSettings, GoogleBooksClient, DOUBAN_BASE_URL,
    DOUBAN_DEFAULT_COUNT, GOOGLE_BASE_URL,
};
use serde::Deserialize;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_PATH: &str = "./metafetch.ron";
pub const API_KEY_ENV: &str = "METAFETCH_DOUBAN_APIKEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub google: GoogleSection,
    pub douban: DoubanSection,
    pub fetch: FetchSection,
    pub jsonp_callback: Option<String>,
    pub messages: MessageBundle,
    pub log: LogSection,
    pub card_template: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GoogleSection {
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DoubanSection {
    pub base_url: String,
    pub api_key: Option<String>,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchSection {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub destination: LogDestination,
    pub level: String,
    pub file: PathBuf,
}

impl Default for GoogleSection {
    fn default() -> Self {
        Self {
            base_url: GOOGLE_BASE_URL.to_string(),
        }
    }
}

impl Default for DoubanSection {
    fn default() -> Self {
        Self {
            base_url: DOUBAN_BASE_URL.to_string(),
            api_key: None,
            count: DOUBAN_DEFAULT_COUNT,
        }
    }
}

impl Default for FetchSection {
    fn default() -> Self {
        let defaults = FetchSettings::default();
        Self {
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
            redirect_limit: defaults.redirect_limit,
            max_bytes: defaults.max_bytes,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            level: "info".to_string(),
            file: PathBuf::from("./metafetch.log"),
        }
    }
}

impl AppConfig {
    /// Loads the config file. An explicit path must exist; the default path
    /// may be missing, in which case defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if explicit.is_none() && err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// A non-empty `METAFETCH_DOUBAN_APIKEY` wins over the file.
    pub fn apply_env_api_key(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|key| !key.trim().is_empty()) {
            self.douban.api_key = Some(key);
        }
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        parse_level(&self.log.level)
    }

    pub fn engine_config(&self) -> EngineConfig {
        let defaults = FetchSettings::default();
        EngineConfig {
            fetch: FetchSettings {
                connect_timeout: Duration::from_secs(self.fetch.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.fetch.request_timeout_secs),
                redirect_limit: self.fetch.redirect_limit,
                max_bytes: self.fetch.max_bytes,
                ..defaults
            },
            google: GoogleBooksClient {
                base_url: self.google.base_url.clone(),
                jsonp_callback: self.jsonp_callback.clone(),
            },
            douban: DoubanClient {
                base_url: self.douban.base_url.clone(),
                api_key: self.douban.api_key.clone(),
                count: self.douban.count,
                jsonp_callback: self.jsonp_callback.clone(),
            },
        }
    }
}

pub fn parse_level(raw: &str) -> Result<LevelFilter, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::LogLevel(raw.to_string()))
}
