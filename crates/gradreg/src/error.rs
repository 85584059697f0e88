use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradregError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Record error: {0}")]
    Record(#[from] crate::record::RecordError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] crate::wizard::WizardError),

    #[error("Credential error: {0}")]
    Credential(#[from] crate::credentials::CredentialError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload extension not allowed: {0}")]
    DisallowedExtension(String),
}

pub type Result<T> = std::result::Result<T, GradregError>;
