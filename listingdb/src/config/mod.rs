use crate::error::{ListingDbError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Backing file used when no path is configured.
pub const DEFAULT_PATH: &str = "realEstateDB.json";

pub const PATH_ENV: &str = "LISTINGDB_PATH";
pub const KEY_STRATEGY_ENV: &str = "LISTINGDB_KEY_STRATEGY";

/// How record keys are generated on create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    #[default]
    Ulid,
    Uuid,
    Nanoid,
}

impl KeyStrategy {
    pub fn generate(&self) -> String {
        match self {
            KeyStrategy::Ulid => ulid::Ulid::new().to_string().to_lowercase(),
            KeyStrategy::Uuid => uuid::Uuid::new_v4().to_string(),
            KeyStrategy::Nanoid => nanoid::nanoid!(),
        }
    }
}

impl FromStr for KeyStrategy {
    type Err = ListingDbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ulid" => Ok(KeyStrategy::Ulid),
            "uuid" => Ok(KeyStrategy::Uuid),
            "nanoid" => Ok(KeyStrategy::Nanoid),
            _ => Err(ListingDbError::InvalidKeyStrategy(s.to_string())),
        }
    }
}

/// On-disk encoding, picked from the backing file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            _ => FileFormat::Json,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Yaml => "yaml",
        }
    }
}

/// Store configuration: where the backing file lives and how keys are made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub key_strategy: KeyStrategy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            path: PathBuf::from(DEFAULT_PATH),
            key_strategy: KeyStrategy::default(),
        }
    }
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_key_strategy(mut self, key_strategy: KeyStrategy) -> Self {
        self.key_strategy = key_strategy;
        self
    }

    /// Read `LISTINGDB_PATH` and `LISTINGDB_KEY_STRATEGY`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Like [`StoreConfig::from_env`] but with an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StoreConfig::default();
        if let Some(path) = lookup(PATH_ENV).filter(|p| !p.is_empty()) {
            config.path = PathBuf::from(path);
        }
        if let Some(strategy) = lookup(KEY_STRATEGY_ENV).filter(|s| !s.is_empty()) {
            config.key_strategy = strategy.parse()?;
        }
        Ok(config)
    }

    /// The backing path made absolute against the current working directory.
    pub fn resolved_path(&self) -> Result<PathBuf> {
        if self.path.is_absolute() {
            Ok(self.path.clone())
        } else {
            Ok(std::env::current_dir()?.join(&self.path))
        }
    }

    pub fn format(&self) -> FileFormat {
        FileFormat::from_path(&self.path)
    }
}
