use crate::{error::Result, store::PersistedState};
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

#[cfg(feature = "sqlite-storage")]
pub use sqlite_storage::SqliteStorage;

/// Storage trait for persisting the board state, one blob per namespace
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Loads the state stored under `namespace`, `None` when nothing was
    /// saved yet
    async fn load_state(&self, namespace: &str) -> Result<Option<PersistedState>>;

    /// Saves the state under `namespace`, replacing any previous blob
    async fn save_state(&self, namespace: &str, state: &PersistedState) -> Result<()>;

    /// Removes the state stored under `namespace`. Clearing a missing
    /// namespace is not an error.
    async fn clear_state(&self, namespace: &str) -> Result<()>;

    /// Checks if the backend is initialized
    async fn is_initialized(&self) -> bool;
}
