//! Environment-backed configuration and the persisted scoring settings.
//!
//! Most settings have defaults. Override with `SENIORMATCH_*` environment variables.

pub mod error;
mod store;


pub use error::{ConfigError, SettingsError};
pub use store::{Settings, SettingsStore, SettingsUpdate};

use std::env;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Datelike;

use crate::constants::{DEFAULT_EMBEDDING_MODEL, DEFAULT_INGEST_WINDOW, DEFAULT_TITLE_MODEL};

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// File name of the settings document under the storage root.
pub const SETTINGS_FILE_NAME: &str = "config.json";

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SENIORMATCH_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Root for caches and the sync checkpoint. Default: `./.data`.
    pub storage_path: PathBuf,

    /// Scoring settings document. Default: `<storage_path>/config.json`.
    pub settings_path: PathBuf,

    /// Canonical title vocabulary, one title per line.
    pub vocabulary_path: Option<PathBuf>,

    /// JSON / JSON-lines file of raw candidate records used by the sync endpoints.
    pub source_path: Option<PathBuf>,

    /// Raw job records for the job sync.
    pub job_source_path: Option<PathBuf>,

    /// API key for the embedding and title-mapping providers. `None` runs the stub providers.
    pub openai_api_key: Option<String>,

    pub openai_base_url: String,

    pub embedding_model: String,

    pub title_model: String,

    /// Max entries per in-memory cache. Default: `100_000`.
    pub memory_cache_capacity: u64,

    /// Records enriched per ingestion window. Default: `200`.
    pub ingest_window: usize,

    /// Year used for "ongoing" roles and recency. Default: the current UTC year.
    pub current_year: i32,

    /// Timeout for each provider request. Default: 60 s.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let storage_path = PathBuf::from("./.data");
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            settings_path: storage_path.join(SETTINGS_FILE_NAME),
            storage_path,
            vocabulary_path: None,
            source_path: None,
            job_source_path: None,
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            title_model: DEFAULT_TITLE_MODEL.to_string(),
            memory_cache_capacity: 100_000,
            ingest_window: DEFAULT_INGEST_WINDOW,
            current_year: chrono::Utc::now().year(),
            request_timeout_secs: 60,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SENIORMATCH_PORT";
    const ENV_BIND_ADDR: &'static str = "SENIORMATCH_BIND_ADDR";
    const ENV_STORAGE_PATH: &'static str = "SENIORMATCH_STORAGE_PATH";
    const ENV_SETTINGS_PATH: &'static str = "SENIORMATCH_SETTINGS_PATH";
    const ENV_VOCABULARY_PATH: &'static str = "SENIORMATCH_VOCABULARY_PATH";
    const ENV_SOURCE_PATH: &'static str = "SENIORMATCH_SOURCE_PATH";
    const ENV_JOB_SOURCE_PATH: &'static str = "SENIORMATCH_JOB_SOURCE_PATH";
    const ENV_OPENAI_API_KEY: &'static str = "SENIORMATCH_OPENAI_API_KEY";
    const ENV_OPENAI_API_KEY_FALLBACK: &'static str = "OPENAI_API_KEY";
    const ENV_OPENAI_BASE_URL: &'static str = "SENIORMATCH_OPENAI_BASE_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "SENIORMATCH_EMBEDDING_MODEL";
    const ENV_TITLE_MODEL: &'static str = "SENIORMATCH_TITLE_MODEL";
    const ENV_CACHE_CAPACITY: &'static str = "SENIORMATCH_CACHE_CAPACITY";
    const ENV_INGEST_WINDOW: &'static str = "SENIORMATCH_INGEST_WINDOW";
    const ENV_CURRENT_YEAR: &'static str = "SENIORMATCH_CURRENT_YEAR";
    const ENV_REQUEST_TIMEOUT: &'static str = "SENIORMATCH_REQUEST_TIMEOUT_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let storage_path = Self::parse_path_from_env(Self::ENV_STORAGE_PATH, defaults.storage_path);
        let settings_path = Self::parse_optional_path_from_env(Self::ENV_SETTINGS_PATH)
            .unwrap_or_else(|| storage_path.join(SETTINGS_FILE_NAME));
        let vocabulary_path = Self::parse_optional_path_from_env(Self::ENV_VOCABULARY_PATH);
        let source_path = Self::parse_optional_path_from_env(Self::ENV_SOURCE_PATH);
        let job_source_path = Self::parse_optional_path_from_env(Self::ENV_JOB_SOURCE_PATH);
        let openai_api_key = Self::parse_optional_string_from_env(Self::ENV_OPENAI_API_KEY)
            .or_else(|| Self::parse_optional_string_from_env(Self::ENV_OPENAI_API_KEY_FALLBACK));
        let openai_base_url =
            Self::parse_string_from_env(Self::ENV_OPENAI_BASE_URL, defaults.openai_base_url);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let title_model = Self::parse_string_from_env(Self::ENV_TITLE_MODEL, defaults.title_model);
        let memory_cache_capacity =
            Self::parse_number_from_env(Self::ENV_CACHE_CAPACITY, defaults.memory_cache_capacity);
        let ingest_window =
            Self::parse_number_from_env(Self::ENV_INGEST_WINDOW, defaults.ingest_window);
        let current_year = Self::parse_number_from_env(Self::ENV_CURRENT_YEAR, defaults.current_year);
        let request_timeout_secs =
            Self::parse_number_from_env(Self::ENV_REQUEST_TIMEOUT, defaults.request_timeout_secs);

        Ok(Self {
            port,
            bind_addr,
            storage_path,
            settings_path,
            vocabulary_path,
            source_path,
            job_source_path,
            openai_api_key,
            openai_base_url,
            embedding_model,
            title_model,
            memory_cache_capacity,
            ingest_window,
            current_year,
            request_timeout_secs,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_path.clone(),
            });
        }

        if self.settings_path.exists() && !self.settings_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.settings_path.clone(),
            });
        }

        for path in [&self.vocabulary_path, &self.source_path, &self.job_source_path].into_iter().flatten() {
            Self::require_file(path)?;
        }

        if self.ingest_window == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_INGEST_WINDOW,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_REQUEST_TIMEOUT,
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Whether the remote providers are configured.
    pub fn has_api_key(&self) -> bool {
        self.openai_api_key.is_some()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Location of the sync checkpoint document.
    pub fn checkpoint_path(&self) -> PathBuf {
        self.storage_path.join(crate::ingest::CHECKPOINT_FILE_NAME)
    }

    fn require_file(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(ConfigError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_number_from_env<T: std::str::FromStr>(var_name: &str, default: T) -> T {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}
