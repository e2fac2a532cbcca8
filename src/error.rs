// Library error type
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON from {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize data: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("File not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Unknown compression preset: {0}")]
    UnknownPreset(String),

    #[error("Failed to start async runtime: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, CompressorError>;
