//! Common error types for the tally service

use thiserror::Error;

/// Common result type for tally operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the store and the service
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store file or its directory cannot be opened/written
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Missing or malformed user input
    #[error("{0}")]
    Validation(String),
}

impl Error {
    /// Message suitable for a client-facing failure payload.
    ///
    /// Database errors carry the engine message only, without the
    /// "Database error:" prefix.
    pub fn client_message(&self) -> String {
        match self {
            Error::Database(e) => match e {
                sqlx::Error::Database(db_err) => db_err.message().to_string(),
                other => other.to_string(),
            },
            other => other.to_string(),
        }
    }
}
