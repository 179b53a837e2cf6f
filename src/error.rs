//! Error types for pkgalter

use thiserror::Error;

/// Main error type for alteration operations
#[derive(Error, Debug)]
pub enum AlterError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Nothing to do")]
    NothingToDo,

    #[error("No matching packages found")]
    NoMatch,

    #[error("Operation aborted")]
    OperationAborted,

    #[error("Package already installed: {0}")]
    AlreadyInstalled(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Formatting fault: {0}")]
    Format(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlterError {
    /// Process exit code for this error
    pub fn code(&self) -> i32 {
        match self {
            AlterError::InvalidParameter(_) => 2,
            AlterError::NothingToDo => 3,
            AlterError::NoMatch => 4,
            AlterError::OperationAborted => 5,
            AlterError::AlreadyInstalled(_) => 6,
            AlterError::Engine(_) => 7,
            AlterError::Format(_) => 8,
            AlterError::Database(_) => 9,
            AlterError::Io(_) => 10,
        }
    }
}

/// Result type alias for alteration operations
pub type Result<T> = std::result::Result<T, AlterError>;
