//! Read-only projections of the board state.

use crate::domain::{ColumnId, Task};
use crate::store::state::BoardState;
use serde::Serialize;
use std::collections::HashMap;

/// Groups the flat sequence into column buckets in a single pass.
///
/// Every live column gets an entry, empty or not, and each bucket keeps
/// flat-sequence order.
pub fn tasks_by_status(state: &BoardState) -> HashMap<ColumnId, Vec<&Task>> {
    let mut buckets: HashMap<ColumnId, Vec<&Task>> = state
        .columns()
        .iter()
        .map(|c| (c.id.clone(), Vec::new()))
        .collect();

    for task in state.tasks() {
        if let Some(bucket) = buckets.get_mut(&task.status) {
            bucket.push(task);
        }
    }

    buckets
}

/// Tasks of one column in display order
pub fn column_tasks<'a>(state: &'a BoardState, column: &ColumnId) -> Vec<&'a Task> {
    state
        .tasks()
        .iter()
        .filter(|t| &t.status == column)
        .collect()
}

/// Board counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub per_column: HashMap<ColumnId, usize>,
    pub incomplete_per_column: HashMap<ColumnId, usize>,
}

impl TaskStats {
    pub fn count(&self, column: &ColumnId) -> usize {
        self.per_column.get(column).copied().unwrap_or(0)
    }

    pub fn incomplete(&self, column: &ColumnId) -> usize {
        self.incomplete_per_column.get(column).copied().unwrap_or(0)
    }

    /// Completed share of all tasks, rounded to a whole percent
    pub fn progress_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let rounded = (self.completed * 200 + self.total) / (self.total * 2);
        rounded.min(100) as u8
    }
}

pub fn task_stats(state: &BoardState) -> TaskStats {
    let mut stats = TaskStats {
        total: state.tasks().len(),
        ..TaskStats::default()
    };

    for column in state.columns() {
        stats.per_column.insert(column.id.clone(), 0);
        stats.incomplete_per_column.insert(column.id.clone(), 0);
    }

    for task in state.tasks() {
        if task.is_done {
            stats.completed += 1;
        }
        if let Some(count) = stats.per_column.get_mut(&task.status) {
            *count += 1;
        }
        if !task.is_done {
            if let Some(count) = stats.incomplete_per_column.get_mut(&task.status) {
                *count += 1;
            }
        }
    }

    stats
}

/// Case-insensitive search over title, description and attached tag names.
/// Results keep flat-sequence order; a blank query matches everything.
pub fn search_tasks<'a>(state: &'a BoardState, query: &str) -> Vec<&'a Task> {
    let query_lower = query.trim().to_lowercase();

    state
        .tasks()
        .iter()
        .filter(|task| {
            let title_matches = task.title.to_lowercase().contains(&query_lower);

            let description_matches = task
                .description
                .as_ref()
                .map(|d| d.to_lowercase().contains(&query_lower))
                .unwrap_or(false);

            let tag_matches = task.tag_ids.iter().any(|id| {
                state
                    .tag(id)
                    .map(|tag| tag.name.to_lowercase().contains(&query_lower))
                    .unwrap_or(false)
            });

            title_matches || description_matches || tag_matches
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::domain::{TagId, TaskId};

    fn state_with(tasks: Vec<Task>) -> BoardState {
        let mut state = BoardState::seeded(&StoreConfig::default());
        state.tasks = tasks;
        state
    }

    fn task(id: &str, title: &str, status: &str) -> Task {
        Task::new(TaskId::from(id), title.to_string(), ColumnId::from(status))
    }

    #[test]
    fn test_tasks_by_status_partitions_in_order() {
        let state = state_with(vec![
            task("1", "One", "todo"),
            task("2", "Two", "done"),
            task("3", "Three", "todo"),
        ]);

        let buckets = tasks_by_status(&state);

        assert_eq!(buckets.len(), 3);
        let todo: Vec<&str> = buckets[&ColumnId::from("todo")]
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(todo, vec!["1", "3"]);
        assert!(buckets[&ColumnId::from("in-progress")].is_empty());
        assert_eq!(buckets[&ColumnId::from("done")].len(), 1);
    }

    #[test]
    fn test_task_stats() {
        let mut done = task("2", "Two", "todo");
        done.mark_done();
        let state = state_with(vec![task("1", "One", "todo"), done, task("3", "Three", "done")]);

        let stats = task_stats(&state);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.count(&ColumnId::from("todo")), 2);
        assert_eq!(stats.incomplete(&ColumnId::from("todo")), 1);
        assert_eq!(stats.count(&ColumnId::from("in-progress")), 0);
        assert_eq!(stats.progress_percent(), 33);
    }

    #[test]
    fn test_progress_percent_rounds_half_up() {
        let stats = TaskStats {
            total: 8,
            completed: 1,
            ..TaskStats::default()
        };
        // 12.5% rounds to 13
        assert_eq!(stats.progress_percent(), 13);
        assert_eq!(TaskStats::default().progress_percent(), 0);
    }

    #[test]
    fn test_search_matches_title_description_and_tags() {
        let mut described = task("2", "Second", "todo");
        described.description = Some("Fix the login flow".to_string());
        let mut tagged = task("3", "Third", "todo");
        tagged.tag_ids = vec![TagId::from("bug")];

        let state = state_with(vec![task("1", "Login page", "todo"), described, tagged]);

        let ids = |q: &str| -> Vec<String> {
            search_tasks(&state, q)
                .iter()
                .map(|t| t.id.to_string())
                .collect()
        };

        assert_eq!(ids("LOGIN"), vec!["1", "2"]);
        assert_eq!(ids("bug"), vec!["3"]);
        assert!(ids("nonexistent").is_empty());
        assert_eq!(ids("").len(), 3);
    }
}
