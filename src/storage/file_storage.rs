use crate::{
    error::{Result, TasklaneError},
    storage::Storage,
    store::PersistedState,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// File-based storage implementation
///
/// Each namespace is stored as `<root>/.tasklane/<namespace>.json`.
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const TASKLANE_DIR: &'static str = ".tasklane";
    const STATE_EXTENSION: &'static str = "json";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::TASKLANE_DIR),
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn state_file(&self, namespace: &str) -> Result<PathBuf> {
        validate_namespace(namespace)?;
        Ok(self
            .root_path
            .join(format!("{namespace}.{}", Self::STATE_EXTENSION)))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

/// Namespaces become file names, so they must not escape the storage dir
fn validate_namespace(namespace: &str) -> Result<()> {
    let valid = !namespace.is_empty()
        && namespace != "."
        && namespace != ".."
        && !namespace.contains(['/', '\\']);

    if valid {
        Ok(())
    } else {
        Err(TasklaneError::StorageError(format!(
            "invalid namespace: {namespace:?}"
        )))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        let gitignore_path = self.root_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, "# Interrupted writes\n*.tmp\n").await?;
        }

        info!(path = %self.root_path.display(), "initialized file storage");
        Ok(())
    }

    async fn load_state(&self, namespace: &str) -> Result<Option<PersistedState>> {
        let file_path = self.state_file(namespace)?;

        if !file_path.exists() {
            debug!(namespace, "no stored state");
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path).await?;
        let state: PersistedState = serde_json::from_str(&contents)?;

        debug!(namespace, tasks = state.tasks.len(), "loaded state");
        Ok(Some(state))
    }

    async fn save_state(&self, namespace: &str, state: &PersistedState) -> Result<()> {
        let file_path = self.state_file(namespace)?;
        self.ensure_directory_exists(&self.root_path).await?;

        // Write to a sibling temp file first so a crash never leaves a
        // truncated state file behind
        let tmp_path = file_path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &file_path).await?;

        debug!(namespace, tasks = state.tasks.len(), "saved state");
        Ok(())
    }

    async fn clear_state(&self, namespace: &str) -> Result<()> {
        let file_path = self.state_file(namespace)?;

        if file_path.exists() {
            fs::remove_file(&file_path).await?;
            info!(namespace, "cleared stored state");
        }
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists()
    }
}
