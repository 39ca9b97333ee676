//! Application configuration.
//!
//! # Responsibility
//! - Load TOML configuration and apply `MEMO_*` environment overrides.
//! - Select the storage backend once at startup.
//!
//! # Invariants
//! - Every field has a default; an absent file yields a usable config.
//! - Backend selection happens only in [`open_repository`].

use crate::logging::default_log_level;
use crate::repo::local_repo::{LocalMemoRepository, DEFAULT_STORAGE_KEY};
use crate::repo::memo_repo::{MemoRepository, RepoResult};
use crate::repo::sqlite_repo::SqliteMemoRepository;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_BACKEND: &str = "MEMO_BACKEND";
pub const ENV_DB_PATH: &str = "MEMO_DB_PATH";
pub const ENV_LOCAL_PATH: &str = "MEMO_LOCAL_PATH";
pub const ENV_LOG_LEVEL: &str = "MEMO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "MEMO_LOG_DIR";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Storage backend variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Relational table in a SQLite file.
    #[default]
    Sqlite,
    /// Namespaced key in a JSON document file.
    Local,
}

impl BackendKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "local" => Some(Self::Local),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Local => "local",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: BackendKind,
    pub sqlite_path: PathBuf,
    pub local_path: PathBuf,
    pub local_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            sqlite_path: PathBuf::from("memos.sqlite3"),
            local_path: PathBuf::from("memo-storage.json"),
            local_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute log directory; defaults to a folder under the temp dir.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("memo-app").join("logs"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Seed sample memos into an empty backend on first load.
    pub seed_sample_data: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub store: StoreSettings,
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads `path` when given, otherwise starts from defaults, then applies
    /// process environment overrides.
    ///
    /// # Errors
    /// - `Io` when an explicit path cannot be read.
    /// - `Parse`/`Invalid` for malformed TOML or override values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies `MEMO_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = lookup(ENV_BACKEND) {
            self.storage.backend = BackendKind::parse(&value).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "{ENV_BACKEND} must be `sqlite` or `local`, got `{value}`"
                ))
            })?;
        }
        if let Some(value) = lookup(ENV_DB_PATH) {
            self.storage.sqlite_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_LOCAL_PATH) {
            self.storage.local_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = value;
        }
        if let Some(value) = lookup(ENV_LOG_DIR) {
            self.logging.dir = Some(PathBuf::from(value));
        }

        if self.storage.local_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.local_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Opens the configured backend.
pub fn open_repository(config: &StorageConfig) -> RepoResult<Box<dyn MemoRepository>> {
    let repo: Box<dyn MemoRepository> = match config.backend {
        BackendKind::Sqlite => Box::new(SqliteMemoRepository::open(&config.sqlite_path)?),
        BackendKind::Local => Box::new(LocalMemoRepository::with_key(
            config.local_path.clone(),
            config.local_key.clone(),
        )),
    };
    info!(
        "event=backend_select module=config status=ok backend={}",
        config.backend.as_str()
    );
    Ok(repo)
}
