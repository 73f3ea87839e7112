use crate::{error::Result, storage::Storage, store::PersistedState};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory storage backend.
///
/// Blobs are kept as serialized JSON so a round trip through this backend
/// behaves like one through disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON stored under `namespace`
    pub async fn raw(&self, namespace: &str) -> Option<String> {
        self.blobs.lock().await.get(namespace).cloned()
    }

    /// Stores raw JSON under `namespace`, bypassing serialization
    pub async fn put_raw(&self, namespace: &str, json: impl Into<String>) {
        self.blobs
            .lock()
            .await
            .insert(namespace.to_string(), json.into());
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn load_state(&self, namespace: &str) -> Result<Option<PersistedState>> {
        let blobs = self.blobs.lock().await;
        match blobs.get(namespace) {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    async fn save_state(&self, namespace: &str, state: &PersistedState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.blobs.lock().await.insert(namespace.to_string(), json);
        debug!(namespace, tasks = state.tasks.len(), "saved state in memory");
        Ok(())
    }

    async fn clear_state(&self, namespace: &str) -> Result<()> {
        self.blobs.lock().await.remove(namespace);
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        true
    }
}
