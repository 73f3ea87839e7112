//! The board state container.
//!
//! `Store` is the only place board state changes. Each mutator either
//! applies completely (bumping the revision and notifying subscribers) or
//! is rejected and leaves the state exactly as it was.

use crate::{
    config::StoreConfig,
    domain::{
        due::due_status, non_blank, task::dedup_tags, Column, ColumnId, ColumnUpdate, DueStatus,
        NewTask, Priority, PriorityLevel, PriorityUpdate, Tag, TagId, TagUpdate, Task, TaskId,
        TaskUpdate,
    },
    error::{Result, TasklaneError},
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, warn};

pub mod events;
pub mod ordering;
pub mod state;
pub mod views;

pub use events::{Listener, StoreChange, SubscriptionId};
pub use ordering::{DropEvent, DropLocation};
pub use state::{BoardState, PersistedState, SCHEMA_VERSION};
pub use views::TaskStats;

use events::Subscribers;

#[derive(Debug)]
pub struct Store {
    state: BoardState,
    config: StoreConfig,
    revision: u64,
    subscribers: Subscribers,
}

impl Store {
    /// Creates a store seeded with the configured default columns and tags
    pub fn new(config: StoreConfig) -> Self {
        Self {
            state: BoardState::seeded(&config),
            config,
            revision: 0,
            subscribers: Subscribers::default(),
        }
    }

    /// Rehydrates a store from persisted state
    pub fn from_persisted(persisted: PersistedState, config: StoreConfig) -> Result<Self> {
        let state = BoardState::from_persisted(persisted, &config)?;
        Ok(Self {
            state,
            config,
            revision: 0,
            subscribers: Subscribers::default(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of transitions applied since the store was created
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        self.state.tasks()
    }

    pub fn columns(&self) -> &[Column] {
        self.state.columns()
    }

    pub fn tags(&self) -> &[Tag] {
        self.state.tags()
    }

    pub fn priorities(&self) -> &[PriorityLevel] {
        self.state.priorities()
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.state.task(id)
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.state.column(id)
    }

    pub fn tag(&self, id: &TagId) -> Option<&Tag> {
        self.state.tag(id)
    }

    pub fn priority_level(&self, priority: Priority) -> Option<&PriorityLevel> {
        self.state.priority_level(priority)
    }

    /// Owned copy of the state in its persisted form
    pub fn snapshot(&self) -> PersistedState {
        self.state.to_persisted()
    }

    pub fn tasks_by_status(&self) -> HashMap<ColumnId, Vec<&Task>> {
        views::tasks_by_status(&self.state)
    }

    pub fn column_tasks(&self, column: &ColumnId) -> Vec<&Task> {
        views::column_tasks(&self.state, column)
    }

    pub fn task_stats(&self) -> TaskStats {
        views::task_stats(&self.state)
    }

    pub fn search_tasks(&self, query: &str) -> Vec<&Task> {
        views::search_tasks(&self.state, query)
    }

    /// Due tier of a task using the configured due-soon window
    pub fn due_status(&self, task: &Task, now: DateTime<Utc>) -> DueStatus {
        due_status(task.due_date, now, self.config.due_soon_days)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Subscriptions
    // ─────────────────────────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreChange, &BoardState) + Send + 'static,
    {
        self.subscribers.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    fn commit(&mut self, change: StoreChange) {
        self.revision += 1;
        debug!(revision = self.revision, ?change, "applied store change");
        self.subscribers.notify(&change, &self.state);
    }

    /// Replaces the whole state, e.g. after reloading from storage
    pub fn replace_state(&mut self, persisted: PersistedState) -> Result<()> {
        self.state = BoardState::from_persisted(persisted, &self.config)?;
        self.commit(StoreChange::StateReplaced);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tasks
    // ─────────────────────────────────────────────────────────────────────

    /// Adds a task at the front of the flat sequence
    pub fn add_task(&mut self, new_task: NewTask) -> Result<TaskId> {
        let Some(title) = non_blank(&new_task.title) else {
            debug!("rejected task with empty title");
            return Err(TasklaneError::EmptyTitle);
        };

        let status = match new_task.status {
            Some(column) => {
                self.require_column(&column)?;
                column
            }
            None => self
                .state
                .first_column_id()
                .cloned()
                .ok_or_else(|| TasklaneError::ColumnNotFound("<none>".to_string()))?,
        };
        let tag_ids = self.require_tags(dedup_tags(new_task.tag_ids))?;

        let mut task = Task::new(TaskId::generate(), title, status);
        task.description = new_task.description.as_deref().and_then(non_blank);
        task.tag_ids = tag_ids;
        task.priority = new_task.priority.unwrap_or_default();
        task.story_points = new_task.story_points;
        task.due_date = new_task.due_date;

        let id = task.id.clone();
        self.state.tasks.insert(0, task);
        self.commit(StoreChange::TaskAdded {
            task_id: id.clone(),
        });
        Ok(id)
    }

    /// Applies the present fields of `update`. The call is rejected as a
    /// whole if any field is invalid.
    pub fn edit_task(&mut self, id: &TaskId, update: TaskUpdate) -> Result<()> {
        let position = self.require_task(id)?;

        let title = match &update.title {
            Some(title) => Some(non_blank(title).ok_or_else(|| {
                debug!(task_id = %id, "rejected edit with empty title");
                TasklaneError::EmptyTitle
            })?),
            None => None,
        };
        if let Some(column) = &update.status {
            self.require_column(column)?;
        }
        let tag_ids = match update.tag_ids {
            Some(tags) => Some(self.require_tags(dedup_tags(tags))?),
            None => None,
        };

        if title.is_none()
            && tag_ids.is_none()
            && update.description.is_none()
            && update.priority.is_none()
            && update.story_points.is_none()
            && update.due_date.is_none()
            && update.status.is_none()
            && update.is_done.is_none()
        {
            return Ok(());
        }

        let task = &mut self.state.tasks[position];
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = description.as_deref().and_then(non_blank);
        }
        if let Some(tag_ids) = tag_ids {
            task.tag_ids = tag_ids;
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(points) = update.story_points {
            task.story_points = points;
        }
        if let Some(due) = update.due_date {
            task.due_date = due;
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        match update.is_done {
            Some(true) => task.mark_done(),
            Some(false) => task.mark_undone(),
            None => {}
        }

        self.commit(StoreChange::TaskUpdated {
            task_id: id.clone(),
        });
        Ok(())
    }

    pub fn delete_task(&mut self, id: &TaskId) -> Result<()> {
        let position = self.require_task(id)?;
        self.state.tasks.remove(position);
        self.commit(StoreChange::TaskDeleted {
            task_id: id.clone(),
        });
        Ok(())
    }

    /// Flips a task's done flag and returns the new value
    pub fn toggle_task_completion(&mut self, id: &TaskId) -> Result<bool> {
        let position = self.require_task(id)?;
        let task = &mut self.state.tasks[position];
        task.toggle_done();
        let is_done = task.is_done;

        self.commit(StoreChange::TaskUpdated {
            task_id: id.clone(),
        });
        Ok(is_done)
    }

    /// Marks every incomplete task of a column as done and returns how many
    /// changed
    pub fn complete_column(&mut self, column: &ColumnId) -> Result<usize> {
        self.require_column(column)?;

        let mut completed = 0;
        for task in self
            .state
            .tasks
            .iter_mut()
            .filter(|t| &t.status == column && !t.is_done)
        {
            task.mark_done();
            completed += 1;
        }

        if completed > 0 {
            self.commit(StoreChange::ColumnCompleted {
                column_id: column.clone(),
                completed,
            });
        }
        Ok(completed)
    }

    /// Changes a task's column without touching its flat position
    pub fn move_task(&mut self, id: &TaskId, status: &ColumnId) -> Result<()> {
        self.require_column(status)?;
        let position = self.require_task(id)?;

        let task = &mut self.state.tasks[position];
        if &task.status == status {
            return Ok(());
        }
        let from = std::mem::replace(&mut task.status, status.clone());

        self.commit(StoreChange::TaskMoved {
            task_id: id.clone(),
            from,
            to: status.clone(),
        });
        Ok(())
    }

    /// Moves the task at `source_index` of a column to `dest_index` of the
    /// same column. Indices are clamped; returns whether anything moved.
    pub fn reorder_tasks(&mut self, source_index: usize, dest_index: usize, column: &ColumnId) -> bool {
        if !self.state.has_column(column) {
            debug!(column_id = %column, "reorder ignored, unknown column");
            return false;
        }

        let moved = ordering::reorder_within_column(
            &mut self.state.tasks,
            column,
            source_index,
            dest_index,
            self.config.reorder_strategy,
        );
        if moved {
            self.commit(StoreChange::TasksReordered {
                column_id: column.clone(),
            });
        }
        moved
    }

    /// Positional move for both same-column reorders and cross-column
    /// moves.
    ///
    /// The task id is authoritative: if `source_column` or `source_index`
    /// disagree with where the task actually is, the actual placement is
    /// used. Unknown tasks or destination columns are ignored. Returns
    /// whether anything moved.
    pub fn move_task_to_position(
        &mut self,
        task_id: &TaskId,
        source_column: &ColumnId,
        dest_column: &ColumnId,
        source_index: usize,
        dest_index: usize,
    ) -> bool {
        let Some(flat_index) = self.state.task_position(task_id) else {
            debug!(task_id = %task_id, "move ignored, unknown task");
            return false;
        };
        if !self.state.has_column(dest_column) {
            debug!(column_id = %dest_column, "move ignored, unknown destination column");
            return false;
        }

        let current = self.state.tasks[flat_index].status.clone();
        if &current != source_column {
            warn!(task_id = %task_id, claimed = %source_column, actual = %current, "source column mismatch");
        }

        if &current == dest_column {
            let bucket = ordering::bucket_positions(&self.state.tasks, &current);
            let actual_index = bucket
                .iter()
                .position(|&p| p == flat_index)
                .unwrap_or(source_index);
            if actual_index != source_index {
                warn!(task_id = %task_id, claimed = source_index, actual = actual_index, "source index mismatch");
            }
            return self.reorder_tasks(actual_index, dest_index, dest_column);
        }

        let moved =
            ordering::move_across_columns(&mut self.state.tasks, flat_index, dest_column, dest_index);
        if moved {
            self.commit(StoreChange::TaskMoved {
                task_id: task_id.clone(),
                from: current,
                to: dest_column.clone(),
            });
        }
        moved
    }

    /// Applies a finished drag gesture. Drops without a destination, or
    /// back onto the slot they came from, are ignored.
    pub fn apply_drop(&mut self, event: &DropEvent) -> bool {
        if event.is_noop() {
            return false;
        }
        let Some(dest) = &event.destination else {
            return false;
        };

        self.move_task_to_position(
            &event.task_id,
            &event.source.column_id,
            &dest.column_id,
            event.source.index,
            dest.index,
        )
    }

    // ─────────────────────────────────────────────────────────────────────
    // Columns
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_column(&mut self, title: &str, icon: &str, color: &str) -> Result<ColumnId> {
        let title = non_blank(title).ok_or(TasklaneError::EmptyTitle)?;
        let column = Column::new(title, icon.to_string(), color.to_string());
        let id = column.id.clone();

        self.state.columns.push(column);
        self.commit(StoreChange::ColumnAdded {
            column_id: id.clone(),
        });
        Ok(id)
    }

    pub fn edit_column(&mut self, id: &ColumnId, update: ColumnUpdate) -> Result<()> {
        let position = self
            .state
            .columns
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| TasklaneError::ColumnNotFound(id.to_string()))?;
        let title = match &update.title {
            Some(title) => Some(non_blank(title).ok_or(TasklaneError::EmptyTitle)?),
            None => None,
        };
        if update.is_empty() {
            return Ok(());
        }

        let column = &mut self.state.columns[position];
        if let Some(title) = title {
            column.title = title;
        }
        if let Some(icon) = update.icon {
            column.icon = icon;
        }
        if let Some(color) = update.color {
            column.color = color;
        }

        self.commit(StoreChange::ColumnUpdated {
            column_id: id.clone(),
        });
        Ok(())
    }

    /// Deletes a column, moving its tasks to the first remaining column.
    /// The last column cannot be deleted.
    pub fn delete_column(&mut self, id: &ColumnId) -> Result<()> {
        self.require_column(id)?;
        let Some(target) = self
            .state
            .columns
            .iter()
            .find(|c| &c.id != id)
            .map(|c| c.id.clone())
        else {
            debug!(column_id = %id, "refused to delete the last column");
            return Err(TasklaneError::LastColumn);
        };

        self.state.columns.retain(|c| &c.id != id);

        let mut reassigned = 0;
        for task in self.state.tasks.iter_mut().filter(|t| &t.status == id) {
            task.status = target.clone();
            reassigned += 1;
        }

        self.commit(StoreChange::ColumnDeleted {
            column_id: id.clone(),
            reassigned_to: target,
            reassigned,
        });
        Ok(())
    }

    /// Moves a column within the column list; indices are clamped
    pub fn reorder_columns(&mut self, source_index: usize, dest_index: usize) -> bool {
        let Some(last) = self.state.columns.len().checked_sub(1) else {
            return false;
        };
        let source = source_index.min(last);
        let dest = dest_index.min(last);
        if source == dest {
            return false;
        }

        let column = self.state.columns.remove(source);
        self.state.columns.insert(dest, column);
        self.commit(StoreChange::ColumnsReordered);
        true
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tags
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_tag(&mut self, name: &str, color: &str, icon: &str) -> Result<TagId> {
        let name = non_blank(name).ok_or(TasklaneError::EmptyName)?;
        let tag = Tag::new(name, color.to_string(), icon.to_string());
        let id = tag.id.clone();

        self.state.tags.push(tag);
        self.commit(StoreChange::TagAdded { tag_id: id.clone() });
        Ok(id)
    }

    pub fn edit_tag(&mut self, id: &TagId, update: TagUpdate) -> Result<()> {
        let position = self
            .state
            .tags
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| TasklaneError::TagNotFound(id.to_string()))?;
        let name = match &update.name {
            Some(name) => Some(non_blank(name).ok_or(TasklaneError::EmptyName)?),
            None => None,
        };
        if update.is_empty() {
            return Ok(());
        }

        let tag = &mut self.state.tags[position];
        if let Some(name) = name {
            tag.name = name;
        }
        if let Some(color) = update.color {
            tag.color = color;
        }
        if let Some(icon) = update.icon {
            tag.icon = icon;
        }

        self.commit(StoreChange::TagUpdated { tag_id: id.clone() });
        Ok(())
    }

    /// Deletes a tag and strips it from every task
    pub fn delete_tag(&mut self, id: &TagId) -> Result<()> {
        if self.state.tag(id).is_none() {
            return Err(TasklaneError::TagNotFound(id.to_string()));
        }

        self.state.tags.retain(|t| &t.id != id);
        for task in self.state.tasks.iter_mut() {
            task.tag_ids.retain(|tag| tag != id);
        }

        self.commit(StoreChange::TagDeleted { tag_id: id.clone() });
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Priorities
    // ─────────────────────────────────────────────────────────────────────

    /// Edits a priority level's display metadata
    pub fn edit_priority(&mut self, priority: Priority, update: PriorityUpdate) -> Result<()> {
        let name = match &update.name {
            Some(name) => Some(non_blank(name).ok_or(TasklaneError::EmptyName)?),
            None => None,
        };
        if update.is_empty() {
            return Ok(());
        }

        let position = match self.state.priorities.iter().position(|p| p.id == priority) {
            Some(position) => position,
            None => {
                self.state
                    .priorities
                    .push(PriorityLevel::default_for(priority));
                self.state.priorities.len() - 1
            }
        };

        let level = &mut self.state.priorities[position];
        if let Some(name) = name {
            level.name = name;
        }
        if let Some(color) = update.color {
            level.color = color;
        }
        if let Some(icon) = update.icon {
            level.icon = icon;
        }

        self.commit(StoreChange::PriorityUpdated { priority });
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Validation helpers
    // ─────────────────────────────────────────────────────────────────────

    fn require_task(&self, id: &TaskId) -> Result<usize> {
        self.state
            .task_position(id)
            .ok_or_else(|| TasklaneError::TaskNotFound(id.to_string()))
    }

    fn require_column(&self, id: &ColumnId) -> Result<()> {
        if self.state.has_column(id) {
            Ok(())
        } else {
            Err(TasklaneError::ColumnNotFound(id.to_string()))
        }
    }

    fn require_tags(&self, tag_ids: Vec<TagId>) -> Result<Vec<TagId>> {
        if let Some(missing) = tag_ids.iter().find(|id| self.state.tag(id).is_none()) {
            return Err(TasklaneError::TagNotFound(missing.to_string()));
        }
        Ok(tag_ids)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
