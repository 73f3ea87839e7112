use crate::{
    error::{Result, TasklaneError},
    storage::Storage,
    store::PersistedState,
};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};
use tracing::{debug, info};

/// SQLite-based storage backend.
///
/// Board blobs live in a single key/value table keyed by namespace.
pub struct SqliteStorage {
    connection: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens (or creates) a database file
    pub fn new(database_path: impl AsRef<Path>) -> Result<Self> {
        let connection = Connection::open(database_path.as_ref())?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// A private database that lives as long as this value
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            connection: Mutex::new(Connection::open_in_memory()?),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| TasklaneError::StorageError("sqlite connection lock poisoned".to_string()))
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn initialize(&self) -> Result<()> {
        self.connection()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS board_state (
                namespace TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;

        info!("initialized sqlite storage");
        Ok(())
    }

    async fn load_state(&self, namespace: &str) -> Result<Option<PersistedState>> {
        let payload: Option<String> = self
            .connection()?
            .query_row(
                "SELECT payload FROM board_state WHERE namespace = ?1",
                params![namespace],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(json) => {
                let state: PersistedState = serde_json::from_str(&json)?;
                debug!(namespace, tasks = state.tasks.len(), "loaded state");
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn save_state(&self, namespace: &str, state: &PersistedState) -> Result<()> {
        let payload = serde_json::to_string(state)?;

        self.connection()?.execute(
            "INSERT INTO board_state (namespace, payload, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(namespace) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
            params![namespace, payload, Utc::now().to_rfc3339()],
        )?;

        debug!(namespace, tasks = state.tasks.len(), "saved state");
        Ok(())
    }

    async fn clear_state(&self, namespace: &str) -> Result<()> {
        let removed = self.connection()?.execute(
            "DELETE FROM board_state WHERE namespace = ?1",
            params![namespace],
        )?;

        if removed > 0 {
            info!(namespace, "cleared stored state");
        }
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        let Ok(connection) = self.connection() else {
            return false;
        };

        connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'board_state'",
                [],
                |row| row.get::<_, i64>(0),
            )
            .map(|count| count > 0)
            .unwrap_or(false)
    }
}
