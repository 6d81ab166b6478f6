use thiserror::Error;

use crate::host::HostError;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The host buffer refused an address, read or write.
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// A child process could not be started.
    #[error("Launch failed: {0}")]
    Launch(String),

    /// The external file opener could not be reached.
    #[error("Open failed: {0}")]
    Open(String),
}
