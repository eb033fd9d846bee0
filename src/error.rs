//! Error types for document loading and storage

use thiserror::Error;

/// Fatal document load failure; the store is reset to empty when this occurs
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("document is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("This does not seem to be a valid Properties file! (`designProperties` is missing or not an object)")]
    MissingDesignProperties,
}

/// Failure reading from or writing to a storage sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}
