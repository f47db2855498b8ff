//! Error types for bcp-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for bcp-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bcp-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Wrong number or shape of command-line arguments
    #[error("Usage: {0}")]
    Usage(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or service error
    #[error("Network error: {0}")]
    Network(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) | Error::Config(_) => 2,        // UsageError
            Error::InvalidUrl(_) | Error::TomlParse(_) => 2, // UsageError
            Error::Network(_) => 3,                         // NetworkError
            Error::Auth(_) => 4,                            // AuthError
            Error::NotFound(_) => 5,                        // NotFound
            _ => 1,                                         // GeneralError
        }
    }

    /// Map an io error, turning a missing file into `NotFound` for `what`
    pub fn from_io(err: std::io::Error, what: impl std::fmt::Display) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(what.to_string())
        } else {
            Error::Io(err)
        }
    }
}
