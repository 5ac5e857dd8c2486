//! Server error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Initialization failed: {0}")]
    Initialize(String),

    #[error("Task failed: {0}")]
    Task(String),
}

pub type ServerResult<T> = Result<T, ServerError>;
