use crate::{
    domain::{board::default_columns, due::DEFAULT_DUE_SOON_DAYS, tag::default_tags, Column, Tag},
    error::{Result, TasklaneError},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// How a same-column reorder rebuilds the flat task sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderStrategy {
    /// The moved task is spliced out and back in next to its new
    /// neighbours; every other task keeps its relative order.
    #[default]
    Splice,
    /// Legacy behavior: the reordered column block is moved to the end of
    /// the flat sequence.
    AppendBlock,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage key the board state is persisted under
    pub namespace: String,
    /// Window, in days, of the due-soon tier
    pub due_soon_days: u32,
    pub reorder_strategy: ReorderStrategy,
    /// Columns a fresh board starts with
    pub default_columns: Vec<Column>,
    /// Tags a fresh board starts with
    pub default_tags: Vec<Tag>,
}

impl StoreConfig {
    pub const DEFAULT_NAMESPACE: &'static str = "task-storage";

    /// Loads configuration from a JSON file, falling back to defaults when
    /// the file does not exist
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).await?;
        let config: StoreConfig = serde_json::from_str(&contents)?;
        config.validate()?;

        debug!(path = %path.display(), namespace = %config.namespace, "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(TasklaneError::ConfigError(
                "namespace must not be empty".to_string(),
            ));
        }
        if self.default_columns.is_empty() {
            return Err(TasklaneError::ConfigError(
                "at least one default column is required".to_string(),
            ));
        }
        if self.due_soon_days == 0 {
            return Err(TasklaneError::ConfigError(
                "due_soon_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: Self::DEFAULT_NAMESPACE.to_string(),
            due_soon_days: DEFAULT_DUE_SOON_DAYS,
            reorder_strategy: ReorderStrategy::default(),
            default_columns: default_columns(),
            default_tags: default_tags(),
        }
    }
}
