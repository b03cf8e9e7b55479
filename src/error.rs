use thiserror::Error;

pub type Result<T> = std::result::Result<T, DevboardError>;

#[derive(Debug, Error)]
pub enum DevboardError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task references missing project: {0}")]
    MissingProject(String),

    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Store not initialized. Call initialize() first.")]
    NotInitialized,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DevboardError {
    /// Returns true for failures raised by the data access layer, as opposed
    /// to validation that happens before any store call.
    pub fn is_store_error(&self) -> bool {
        !matches!(
            self,
            Self::Validation(_) | Self::InvalidId(_) | Self::ConfigError(_)
        )
    }
}
