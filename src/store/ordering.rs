//! Positional moves over the flat task sequence.
//!
//! A column bucket is never stored; it is the subsequence of tasks whose
//! status equals the column id. Every operation here rewrites the single
//! flat `Vec<Task>` and leaves the relative order of uninvolved tasks
//! untouched.

use crate::{
    config::ReorderStrategy,
    domain::{ColumnId, Task, TaskId},
};
use serde::{Deserialize, Serialize};

/// One end of a drag-and-drop gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropLocation {
    pub column_id: ColumnId,
    pub index: usize,
}

impl DropLocation {
    pub fn new(column_id: ColumnId, index: usize) -> Self {
        Self { column_id, index }
    }
}

/// A finished drag gesture. `destination` is `None` when the task was
/// dropped outside any column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropEvent {
    pub task_id: TaskId,
    pub source: DropLocation,
    pub destination: Option<DropLocation>,
}

impl DropEvent {
    /// True when the drop changes nothing: no destination, or the exact
    /// slot the task was picked up from
    pub fn is_noop(&self) -> bool {
        match &self.destination {
            None => true,
            Some(dest) => dest == &self.source,
        }
    }
}

/// Flat indices of a column's tasks, ascending
pub(crate) fn bucket_positions(tasks: &[Task], column: &ColumnId) -> Vec<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| &t.status == column)
        .map(|(i, _)| i)
        .collect()
}

/// Moves the task at `source_index` of a column bucket to `dest_index` of
/// the same bucket. Both indices are clamped to the bucket. Returns whether
/// anything moved.
pub(crate) fn reorder_within_column(
    tasks: &mut Vec<Task>,
    column: &ColumnId,
    source_index: usize,
    dest_index: usize,
    strategy: ReorderStrategy,
) -> bool {
    let positions = bucket_positions(tasks, column);
    let Some(last) = positions.len().checked_sub(1) else {
        return false;
    };

    let source = source_index.min(last);
    let dest = dest_index.min(last);
    if source == dest {
        return false;
    }

    match strategy {
        ReorderStrategy::Splice => {
            let task = tasks.remove(positions[source]);
            splice_into_column(tasks, task, column, dest);
        }
        ReorderStrategy::AppendBlock => {
            let mut order = positions.clone();
            let moved = order.remove(source);
            order.insert(dest, moved);

            let mut slots: Vec<Option<Task>> =
                std::mem::take(tasks).into_iter().map(Some).collect();
            let mut rebuilt = Vec::with_capacity(slots.len());
            for (i, slot) in slots.iter_mut().enumerate() {
                if positions.binary_search(&i).is_err() {
                    if let Some(task) = slot.take() {
                        rebuilt.push(task);
                    }
                }
            }
            for from in order {
                if let Some(task) = slots[from].take() {
                    rebuilt.push(task);
                }
            }
            *tasks = rebuilt;
        }
    }

    true
}

/// Splices the task at flat index `flat_index` out of its column and into
/// `dest` at bucket index `dest_index` (clamped to append). The caller
/// guarantees `dest` differs from the task's current column.
pub(crate) fn move_across_columns(
    tasks: &mut Vec<Task>,
    flat_index: usize,
    dest: &ColumnId,
    dest_index: usize,
) -> bool {
    if flat_index >= tasks.len() {
        return false;
    }

    let mut task = tasks.remove(flat_index);
    task.status = dest.clone();
    splice_into_column(tasks, task, dest, dest_index);
    true
}

/// Inserts `task` so it lands at bucket index `dest_index` of `column`:
/// before the column's first task for index 0, after its last task for
/// an index past the end, otherwise before the task holding that index.
/// An empty column receives the task at the end of the sequence.
fn splice_into_column(tasks: &mut Vec<Task>, task: Task, column: &ColumnId, dest_index: usize) {
    let positions = bucket_positions(tasks, column);
    let insert_at = match (positions.first(), positions.last()) {
        (Some(&first), _) if dest_index == 0 => first,
        (Some(_), Some(&last)) if dest_index >= positions.len() => last + 1,
        (Some(_), _) => positions[dest_index],
        _ => tasks.len(),
    };

    tasks.insert(insert_at, task);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, status: &str) -> Task {
        Task::new(TaskId::from(id), id.to_uppercase(), ColumnId::from(status))
    }

    fn flat(tasks: &[Task]) -> Vec<String> {
        tasks
            .iter()
            .map(|t| format!("{}:{}", t.id, t.status))
            .collect()
    }

    fn board() -> Vec<Task> {
        vec![
            task("a", "todo"),
            task("x", "doing"),
            task("b", "todo"),
            task("y", "doing"),
            task("c", "todo"),
        ]
    }

    #[test]
    fn test_bucket_positions() {
        let tasks = board();
        assert_eq!(bucket_positions(&tasks, &ColumnId::from("todo")), vec![0, 2, 4]);
        assert_eq!(bucket_positions(&tasks, &ColumnId::from("doing")), vec![1, 3]);
        assert!(bucket_positions(&tasks, &ColumnId::from("done")).is_empty());
    }

    #[test]
    fn test_reorder_splices_task() {
        let mut tasks = board();
        let moved = reorder_within_column(
            &mut tasks,
            &ColumnId::from("todo"),
            2,
            0,
            ReorderStrategy::Splice,
        );

        assert!(moved);
        assert_eq!(
            flat(&tasks),
            vec!["c:todo", "a:todo", "x:doing", "b:todo", "y:doing"]
        );
    }

    #[test]
    fn test_reorder_append_block_moves_column_to_end() {
        let mut tasks = board();
        let moved = reorder_within_column(
            &mut tasks,
            &ColumnId::from("todo"),
            0,
            2,
            ReorderStrategy::AppendBlock,
        );

        assert!(moved);
        assert_eq!(
            flat(&tasks),
            vec!["x:doing", "y:doing", "b:todo", "c:todo", "a:todo"]
        );
    }

    #[test]
    fn test_reorder_clamps_out_of_range_indices() {
        let mut tasks = board();
        let moved = reorder_within_column(
            &mut tasks,
            &ColumnId::from("doing"),
            7,
            0,
            ReorderStrategy::Splice,
        );

        assert!(moved);
        assert_eq!(
            flat(&tasks),
            vec!["a:todo", "y:doing", "x:doing", "b:todo", "c:todo"]
        );
    }

    #[test]
    fn test_reorder_same_index_or_empty_column_is_noop() {
        let mut tasks = board();
        let before = flat(&tasks);

        assert!(!reorder_within_column(
            &mut tasks,
            &ColumnId::from("todo"),
            1,
            1,
            ReorderStrategy::Splice
        ));
        assert!(!reorder_within_column(
            &mut tasks,
            &ColumnId::from("done"),
            0,
            1,
            ReorderStrategy::AppendBlock
        ));
        assert_eq!(flat(&tasks), before);
    }

    #[test]
    fn test_move_into_empty_column_appends() {
        let mut tasks = board();
        assert!(move_across_columns(&mut tasks, 0, &ColumnId::from("done"), 0));
        assert_eq!(
            flat(&tasks),
            vec!["x:doing", "b:todo", "y:doing", "c:todo", "a:done"]
        );
    }

    #[test]
    fn test_move_to_front_of_column() {
        let mut tasks = board();
        assert!(move_across_columns(&mut tasks, 4, &ColumnId::from("doing"), 0));
        assert_eq!(
            flat(&tasks),
            vec!["a:todo", "c:doing", "x:doing", "b:todo", "y:doing"]
        );
    }

    #[test]
    fn test_move_to_middle_of_column() {
        let mut tasks = board();
        assert!(move_across_columns(&mut tasks, 0, &ColumnId::from("doing"), 1));
        assert_eq!(
            flat(&tasks),
            vec!["x:doing", "b:todo", "a:doing", "y:doing", "c:todo"]
        );
    }

    #[test]
    fn test_move_past_end_goes_after_last() {
        let mut tasks = board();
        assert!(move_across_columns(&mut tasks, 3, &ColumnId::from("todo"), 99));
        assert_eq!(
            flat(&tasks),
            vec!["a:todo", "x:doing", "b:todo", "c:todo", "y:todo"]
        );
    }

    #[test]
    fn test_move_with_bad_flat_index_is_noop() {
        let mut tasks = board();
        assert!(!move_across_columns(&mut tasks, 5, &ColumnId::from("done"), 0));
        assert_eq!(tasks.len(), 5);
    }

    #[test]
    fn test_drop_event_noop_detection() {
        let source = DropLocation::new(ColumnId::from("todo"), 1);
        let mut event = DropEvent {
            task_id: TaskId::from("a"),
            source: source.clone(),
            destination: None,
        };
        assert!(event.is_noop());

        event.destination = Some(source);
        assert!(event.is_noop());

        event.destination = Some(DropLocation::new(ColumnId::from("todo"), 0));
        assert!(!event.is_noop());
    }
}
