use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingDbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<ListingDbError>,
    },

    #[error("Key already exists: {key}")]
    KeyConflict { key: String },

    #[error("Unknown key strategy: {0}")]
    InvalidKeyStrategy(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ListingDbError>;
