pub mod board;
pub mod due;
pub mod ids;
pub mod priority;
pub mod sorting;
pub mod tag;
pub mod task;

pub use board::{default_columns, Column, ColumnUpdate};
pub use due::{due_status, format_due_date, is_due_soon, is_due_today, is_overdue, DueStatus};
pub use ids::{ColumnId, TagId, TaskId};
pub use priority::{default_priorities, Priority, PriorityLevel, PriorityUpdate};
pub use sorting::{sort_tasks, SortField, SortOrder};
pub use tag::{default_tags, Tag, TagUpdate};
pub use task::{NewTask, Task, TaskUpdate};

/// Trims user text, mapping blank input to `None`
pub(crate) fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
