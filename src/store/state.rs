use crate::{
    config::StoreConfig,
    domain::{
        default_columns, priority::normalize_priorities, Column, ColumnId, Priority,
        PriorityLevel, Tag, TagId, Task, TaskId,
    },
    error::{Result, TasklaneError},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Version written into every persisted blob
pub const SCHEMA_VERSION: u32 = 1;

/// The four entity collections.
///
/// `tasks` is the flat sequence: a column's display order is the relative
/// order of its tasks here. Collections are only mutated by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    pub(crate) tasks: Vec<Task>,
    pub(crate) columns: Vec<Column>,
    pub(crate) tags: Vec<Tag>,
    pub(crate) priorities: Vec<PriorityLevel>,
}

impl BoardState {
    /// An empty board seeded with the configured columns and tags
    pub fn seeded(config: &StoreConfig) -> Self {
        Self {
            tasks: Vec::new(),
            columns: seed_columns(config),
            tags: config.default_tags.clone(),
            priorities: normalize_priorities(Vec::new()),
        }
    }

    /// Rebuilds state from a persisted blob, repairing dangling references
    pub fn from_persisted(persisted: PersistedState, config: &StoreConfig) -> Result<Self> {
        if persisted.version > SCHEMA_VERSION {
            return Err(TasklaneError::UnsupportedSchemaVersion {
                found: persisted.version,
                supported: SCHEMA_VERSION,
            });
        }

        let PersistedState {
            mut tasks,
            mut columns,
            mut tags,
            priorities,
            ..
        } = persisted;

        let before = columns.len();
        let mut seen = HashSet::new();
        columns.retain(|c| seen.insert(c.id.clone()));
        if columns.len() != before {
            warn!(dropped = before - columns.len(), "dropped columns with duplicate ids");
        }

        let before = tags.len();
        let mut seen = HashSet::new();
        tags.retain(|t| seen.insert(t.id.clone()));
        if tags.len() != before {
            warn!(dropped = before - tags.len(), "dropped tags with duplicate ids");
        }

        if columns.is_empty() {
            warn!("persisted board has no columns, restoring defaults");
            columns = seed_columns(config);
        }

        if let Some(first) = columns.first().map(|c| c.id.clone()) {
            for task in tasks.iter_mut() {
                if !columns.iter().any(|c| c.id == task.status) {
                    warn!(task_id = %task.id, status = %task.status, "task points at a missing column, reassigning");
                    task.status = first.clone();
                }
            }
        }

        for task in tasks.iter_mut() {
            let before = task.tag_ids.len();
            task.tag_ids.retain(|tag| tags.iter().any(|t| &t.id == tag));
            if task.tag_ids.len() != before {
                warn!(task_id = %task.id, "dropped unknown tag ids");
            }
        }

        Ok(Self {
            tasks,
            columns,
            tags,
            priorities: normalize_priorities(priorities),
        })
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            version: SCHEMA_VERSION,
            tasks: self.tasks.clone(),
            columns: self.columns.clone(),
            tags: self.tags.clone(),
            priorities: self.priorities.clone(),
        }
    }

    /// All tasks in flat order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn priorities(&self) -> &[PriorityLevel] {
        &self.priorities
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn tag(&self, id: &TagId) -> Option<&Tag> {
        self.tags.iter().find(|t| &t.id == id)
    }

    pub fn priority_level(&self, priority: Priority) -> Option<&PriorityLevel> {
        self.priorities.iter().find(|p| p.id == priority)
    }

    pub fn has_column(&self, id: &ColumnId) -> bool {
        self.column(id).is_some()
    }

    pub fn first_column_id(&self) -> Option<&ColumnId> {
        self.columns.first().map(|c| &c.id)
    }

    pub(crate) fn task_position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }
}

/// Configured seed columns, or the built-in ones when none are configured
fn seed_columns(config: &StoreConfig) -> Vec<Column> {
    if config.default_columns.is_empty() {
        warn!("no default columns configured, using built-in columns");
        default_columns()
    } else {
        config.default_columns.clone()
    }
}

/// The serialized form of the whole board, stored under one namespace key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub priorities: Vec<PriorityLevel>,
}

// Blobs written before versioning carry no marker
fn default_version() -> u32 {
    SCHEMA_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_priorities;

    fn task(id: &str, status: &str) -> Task {
        Task::new(TaskId::from(id), format!("Task {}", id), ColumnId::from(status))
    }

    #[test]
    fn test_seeded_state() {
        let state = BoardState::seeded(&StoreConfig::default());
        assert!(state.tasks().is_empty());
        assert_eq!(state.columns().len(), 3);
        assert_eq!(state.tags().len(), 4);
        assert_eq!(state.priorities(), default_priorities().as_slice());
        assert_eq!(state.first_column_id().unwrap().as_str(), "todo");
    }

    #[test]
    fn test_from_persisted_repairs_dangling_references() {
        let config = StoreConfig::default();
        let mut orphan = task("a", "gone");
        orphan.tag_ids = vec![TagId::from("bug"), TagId::from("deleted")];

        let persisted = PersistedState {
            version: SCHEMA_VERSION,
            tasks: vec![orphan, task("b", "done")],
            columns: config.default_columns.clone(),
            tags: config.default_tags.clone(),
            priorities: Vec::new(),
        };

        let state = BoardState::from_persisted(persisted, &config).unwrap();

        assert_eq!(state.tasks()[0].status.as_str(), "todo");
        assert_eq!(state.tasks()[0].tag_ids, vec![TagId::from("bug")]);
        assert_eq!(state.tasks()[1].status.as_str(), "done");
        assert_eq!(state.priorities().len(), 4);
    }

    #[test]
    fn test_from_persisted_restores_columns_when_empty() {
        let config = StoreConfig::default();
        let persisted = PersistedState {
            version: SCHEMA_VERSION,
            tasks: vec![task("a", "whatever")],
            columns: Vec::new(),
            tags: Vec::new(),
            priorities: Vec::new(),
        };

        let state = BoardState::from_persisted(persisted, &config).unwrap();
        assert_eq!(state.columns().len(), 3);
        assert_eq!(state.tasks()[0].status.as_str(), "todo");
    }

    #[test]
    fn test_from_persisted_drops_duplicate_ids() {
        let config = StoreConfig::default();
        let mut todo_again = config.default_columns[0].clone();
        todo_again.title = "Second To Do".to_string();
        let mut bug_again = config.default_tags[2].clone();
        bug_again.name = "Second Bug".to_string();

        let mut columns = config.default_columns.clone();
        columns.push(todo_again);
        let mut tags = config.default_tags.clone();
        tags.push(bug_again);

        let persisted = PersistedState {
            version: SCHEMA_VERSION,
            tasks: vec![task("a", "todo")],
            columns,
            tags,
            priorities: Vec::new(),
        };

        let state = BoardState::from_persisted(persisted, &config).unwrap();

        assert_eq!(state.columns().len(), 3);
        assert_eq!(state.column(&ColumnId::from("todo")).unwrap().title, "To Do");
        assert_eq!(state.tags().len(), 4);
        assert_eq!(state.tag(&TagId::from("bug")).unwrap().name, "Bug");
    }

    #[test]
    fn test_empty_configured_columns_fall_back_to_built_in() {
        let config = StoreConfig {
            default_columns: Vec::new(),
            ..StoreConfig::default()
        };

        let seeded = BoardState::seeded(&config);
        assert_eq!(seeded.columns(), default_columns().as_slice());

        let persisted = PersistedState {
            version: SCHEMA_VERSION,
            tasks: vec![task("a", "todo")],
            columns: Vec::new(),
            tags: Vec::new(),
            priorities: Vec::new(),
        };
        let restored = BoardState::from_persisted(persisted, &config).unwrap();
        assert_eq!(restored.columns().len(), 3);
        assert_eq!(restored.tasks()[0].status.as_str(), "todo");
    }

    #[test]
    fn test_from_persisted_rejects_newer_schema() {
        let mut persisted = BoardState::seeded(&StoreConfig::default()).to_persisted();
        persisted.version = SCHEMA_VERSION + 1;

        let result = BoardState::from_persisted(persisted, &StoreConfig::default());
        assert!(matches!(
            result,
            Err(TasklaneError::UnsupportedSchemaVersion { .. })
        ));
    }

    #[test]
    fn test_unversioned_blob_loads() {
        let json = r##"{
            "tasks": [{"id": "1", "title": "Old", "status": "todo", "tagIds": [], "createdAt": "2024-01-01T00:00:00Z"}],
            "columns": [{"id": "todo", "title": "To Do", "icon": "📋", "color": "#3b82f6"}],
            "tags": []
        }"##;

        let persisted: PersistedState = serde_json::from_str(json).unwrap();
        assert_eq!(persisted.version, SCHEMA_VERSION);

        let state = BoardState::from_persisted(persisted, &StoreConfig::default()).unwrap();
        assert_eq!(state.tasks().len(), 1);
        assert_eq!(state.priorities().len(), 4);
    }
}
