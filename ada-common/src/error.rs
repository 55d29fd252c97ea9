//! Common error types for ADA services

use thiserror::Error;

/// Common result type for ADA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across ADA services
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parse error for the bootstrap config file
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}
