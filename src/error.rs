// file: src/error.rs
// version: 1.0.0
// guid: c3d4e5f6-a7b8-4901-2345-6789cdef0123

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Error types for the provisioning agent.
///
/// Only errors that escape a step are represented here; recoverable step
/// outcomes (missing overlay file, single package failing to install) are
/// reported through the step result instead and never become errors.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Insufficient privilege: {0}")]
    Privilege(String),

    #[error("Command execution error: {0}")]
    Execution(String),

    #[error("System error: {0}")]
    System(String),
}

impl ProvisionError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new privilege error
    pub fn privilege(msg: impl Into<String>) -> Self {
        Self::Privilege(msg.into())
    }

    /// Create a new execution error
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create a new system error
    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }
}
