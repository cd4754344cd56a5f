use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("archive request failed: HTTP {0}")]
    ArchiveStatus(u16),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("transfer failed: {0}")]
    Transfer(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
