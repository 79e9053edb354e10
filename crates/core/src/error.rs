//! Error types for cold2warm
//!
//! Storage adapters map their SDK errors into these variants so the core
//! pipeline never depends on a particular backend.

use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by configuration, storage adapters and the restore pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport or remote service failure
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials rejected by the remote service
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Bucket or object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A remote call exceeded its deadline
    #[error("Timed out: {0}")]
    Timeout(String),

    /// The run was cancelled before the operation finished
    #[error("Operation cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("{0}")]
    General(String),
}

impl Error {
    /// Process exit code for a run that ends with this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::TomlParse(_) => 2,
            Error::Network(_) | Error::Timeout(_) => 3,
            Error::Auth(_) => 4,
            Error::NotFound(_) => 5,
            Error::Cancelled => 130,
            Error::Io(_) | Error::General(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_keeps_remote_message() {
        let err = Error::Network("Service error: boom (code: RestoreAlreadyInProgress)".into());
        assert!(err.to_string().contains("RestoreAlreadyInProgress"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::Config("bad".into()).exit_code(), 2);
        assert_eq!(Error::Timeout("page".into()).exit_code(), 3);
        assert_eq!(Error::Auth("denied".into()).exit_code(), 4);
        assert_eq!(Error::Cancelled.exit_code(), 130);
        assert_eq!(Error::General("x".into()).exit_code(), 1);
    }
}
