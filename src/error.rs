use thiserror::Error;

pub type Result<T> = std::result::Result<T, TasklaneError>;

#[derive(Debug, Error)]
pub enum TasklaneError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Name must not be empty")]
    EmptyName,

    #[error("Cannot delete the last remaining column")]
    LastColumn,

    #[error("Invalid id: {0:?}")]
    InvalidId(String),

    #[error("Unsupported schema version {found} (this build reads up to {supported})")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "sqlite-storage")]
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
