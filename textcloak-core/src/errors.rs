//! Error types for TextCloak

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TextCloakError>;

#[derive(Error, Debug)]
pub enum TextCloakError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Catalog mismatch for prompt '{prompt_id}', cipher '{cipher}': stored variant does not re-derive from pinned key material")]
    CatalogMismatch { prompt_id: String, cipher: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}
