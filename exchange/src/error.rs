//! Exchange client error types.

use std::path::PathBuf;

/// Errors that can occur during exchange client operations.
///
/// Rate-limit waits are not errors: the client sleeps and then proceeds.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("order not found: {0}")]
    NotFound(String),

    #[error("order already closed: {0}")]
    AlreadyClosed(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Network, parse, or API failure from the live exchange, message verbatim.
    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("{0} is not supported in this mode")]
    Unsupported(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl From<papertrex::Error> for ExchangeError {
    fn from(e: papertrex::Error) -> Self {
        match e {
            papertrex::Error::NotFound(id) => ExchangeError::NotFound(id.to_string()),
            papertrex::Error::AlreadyClosed(id) => ExchangeError::AlreadyClosed(id.to_string()),
            papertrex::Error::InvalidArgument(msg) => ExchangeError::InvalidArgument(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
