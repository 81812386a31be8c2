//! Error types raised while loading datasets, charts and configuration.

use thiserror::Error;

/// Errors surfaced by the data loaders.
///
/// The scoring engine itself never fails; only the edges that read files or
/// decode documents produce these.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown type '{0}'")]
    UnknownType(String),
}

pub type Result<T> = std::result::Result<T, DataError>;
