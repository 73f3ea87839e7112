use crate::domain::ids::{ColumnId, TagId, TaskId};
use crate::domain::priority::Priority;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A kanban task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Id of the column the task sits in
    pub status: ColumnId,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates an open task in the given column
    pub fn new(id: TaskId, title: String, status: ColumnId) -> Self {
        Self {
            id,
            title,
            description: None,
            status,
            tag_ids: Vec::new(),
            priority: Priority::default(),
            story_points: None,
            due_date: None,
            created_at: Utc::now(),
            is_done: false,
            done_date: None,
        }
    }

    pub fn mark_done(&mut self) {
        if !self.is_done {
            self.is_done = true;
            self.done_date = Some(Utc::now());
        }
    }

    pub fn mark_undone(&mut self) {
        self.is_done = false;
        self.done_date = None;
    }

    pub fn toggle_done(&mut self) {
        if self.is_done {
            self.mark_undone();
        } else {
            self.mark_done();
        }
    }

    pub fn has_tag(&self, tag: &TagId) -> bool {
        self.tag_ids.contains(tag)
    }
}

/// Arguments for creating a task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub tag_ids: Vec<TagId>,
    pub priority: Option<Priority>,
    pub story_points: Option<u32>,
    pub due_date: Option<DateTime<Utc>>,
    /// Target column; the first column when absent
    pub status: Option<ColumnId>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tags(mut self, tag_ids: impl IntoIterator<Item = TagId>) -> Self {
        self.tag_ids = tag_ids.into_iter().collect();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn story_points(mut self, points: u32) -> Self {
        self.story_points = Some(points);
        self
    }

    pub fn due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn status(mut self, column: ColumnId) -> Self {
        self.status = Some(column);
        self
    }
}

/// Field updates for a task.
///
/// An absent field leaves the task untouched. Clearable fields use a nested
/// option: `Some(None)` clears the value, `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<TagId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_points: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ColumnId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_done: Option<bool>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn tags(mut self, tag_ids: impl IntoIterator<Item = TagId>) -> Self {
        self.tag_ids = Some(tag_ids.into_iter().collect());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn story_points(mut self, points: u32) -> Self {
        self.story_points = Some(Some(points));
        self
    }

    pub fn clear_story_points(mut self) -> Self {
        self.story_points = Some(None);
        self
    }

    pub fn due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(Some(due));
        self
    }

    pub fn clear_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    pub fn status(mut self, column: ColumnId) -> Self {
        self.status = Some(column);
        self
    }

    pub fn done(mut self, is_done: bool) -> Self {
        self.is_done = Some(is_done);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Removes duplicate tag ids, keeping first occurrences in order
pub(crate) fn dedup_tags(tag_ids: Vec<TagId>) -> Vec<TagId> {
    let mut unique = Vec::with_capacity(tag_ids.len());
    for tag in tag_ids {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        Task::new(TaskId::from("t1"), "Write docs".to_string(), ColumnId::from("todo"))
    }

    #[test]
    fn test_new_task_defaults() {
        let task = sample();
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.is_done);
        assert!(task.done_date.is_none());
        assert!(task.tag_ids.is_empty());
    }

    #[test]
    fn test_mark_done_stamps_date() {
        let mut task = sample();
        task.mark_done();
        assert!(task.is_done);
        assert!(task.done_date.is_some());

        let stamped = task.done_date;
        task.mark_done();
        assert_eq!(task.done_date, stamped);
    }

    #[test]
    fn test_toggle_done_clears_date() {
        let mut task = sample();
        task.toggle_done();
        assert!(task.is_done);

        task.toggle_done();
        assert!(!task.is_done);
        assert!(task.done_date.is_none());
    }

    #[test]
    fn test_update_builder_distinguishes_clear_from_absent() {
        let update = TaskUpdate::new().clear_description();
        assert_eq!(update.description, Some(None));
        assert_eq!(update.story_points, None);
        assert!(!update.is_empty());
        assert!(TaskUpdate::new().is_empty());
    }

    #[test]
    fn test_update_deserializes_present_fields_only() {
        let update: TaskUpdate = serde_json::from_str(r#"{"storyPoints": 5}"#).unwrap();
        assert_eq!(update.story_points, Some(Some(5)));
        assert_eq!(update.title, None);
        assert_eq!(update.due_date, None);
    }

    #[test]
    fn test_dedup_tags_keeps_first_occurrence() {
        let tags = dedup_tags(vec![
            TagId::from("bug"),
            TagId::from("feature"),
            TagId::from("bug"),
        ]);
        assert_eq!(tags, vec![TagId::from("bug"), TagId::from("feature")]);
    }

    #[test]
    fn test_task_serialization_roundtrip_with_dates() {
        let mut task = sample();
        task.due_date = Some(Utc::now() + chrono::Duration::days(2));
        task.mark_done();

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"doneDate\""));

        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_backwards_compatibility_deserialization() {
        let old_json = r#"{
            "id": "1719000000000",
            "title": "Old Task",
            "status": "todo",
            "tagIds": ["bug"],
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;

        let task: Task = serde_json::from_str(old_json).unwrap();
        assert_eq!(task.id.as_str(), "1719000000000");
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.is_done);
        assert!(task.due_date.is_none());
    }
}
