use crate::domain::ids::ColumnId;
use serde::{Deserialize, Serialize};

/// A pipeline stage on the board. A task's status is the id of the column
/// it sits in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub icon: String,
    pub color: String,
}

impl Column {
    /// Creates a column with a freshly generated id
    pub fn new(title: String, icon: String, color: String) -> Self {
        Self::with_id(ColumnId::generate(), title, icon, color)
    }

    pub fn with_id(id: ColumnId, title: String, icon: String, color: String) -> Self {
        Self {
            id,
            title,
            icon,
            color,
        }
    }
}

/// Seed columns for a fresh board
pub fn default_columns() -> Vec<Column> {
    [
        ("todo", "To Do", "📋", "#3b82f6"),
        ("in-progress", "In Progress", "⚡", "#f59e0b"),
        ("done", "Done", "✅", "#10b981"),
    ]
    .into_iter()
    .map(|(id, title, icon, color)| {
        Column::with_id(
            ColumnId::from(id),
            title.to_string(),
            icon.to_string(),
            color.to_string(),
        )
    })
    .collect()
}

/// Field updates for a column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ColumnUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.icon.is_none() && self.color.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns() {
        let columns = default_columns();
        let ids: Vec<&str> = columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["todo", "in-progress", "done"]);
    }

    #[test]
    fn test_new_column_gets_generated_id() {
        let a = Column::new("Backlog".into(), "🗂".into(), "#000".into());
        let b = Column::new("Backlog".into(), "🗂".into(), "#000".into());
        assert_ne!(a.id, b.id);
    }
}
