use crate::domain::task::Task;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::str::FromStr;

/// Fields available for sorting a task list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Created,
    DueDate,
    Priority,
    Title,
}

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" | "createdat" => Ok(SortField::Created),
            "due" | "duedate" => Ok(SortField::DueDate),
            "priority" => Ok(SortField::Priority),
            "title" => Ok(SortField::Title),
            _ => Err(format!(
                "Invalid sort field '{}'. Valid fields: created, due, priority, title",
                s
            )),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid orders: asc, desc",
                s
            )),
        }
    }
}

/// Sorts a task list in place for list-style views.
///
/// The sort is stable, so tasks that compare equal keep their board order.
/// This never touches the store's own ordering; pass it a copy.
///
/// # Examples
/// ```
/// use tasklane_core::domain::sorting::{sort_tasks, SortField, SortOrder};
/// use tasklane_core::domain::{ColumnId, Task, TaskId};
///
/// let mut tasks = vec![
///     Task::new(TaskId::from("1"), "Charlie".to_string(), ColumnId::from("todo")),
///     Task::new(TaskId::from("2"), "alpha".to_string(), ColumnId::from("todo")),
/// ];
///
/// sort_tasks(&mut tasks, SortField::Title, SortOrder::Ascending);
/// assert_eq!(tasks[0].title, "alpha");
/// ```
pub fn sort_tasks(tasks: &mut [Task], field: SortField, order: SortOrder) {
    tasks.sort_by(|a, b| {
        let cmp = match field {
            SortField::Created => a.created_at.cmp(&b.created_at),
            SortField::DueDate => return compare_due_dates(a.due_date, b.due_date, order),
            SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        };

        match order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}

/// Compare optional due dates with None always sorting to the end
///
/// Tasks without a due date come after every dated task, regardless of
/// sort order.
fn compare_due_dates(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
    order: SortOrder,
) -> Ordering {
    match (a, b) {
        (Some(a_date), Some(b_date)) => match order {
            SortOrder::Ascending => a_date.cmp(&b_date),
            SortOrder::Descending => b_date.cmp(&a_date),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
