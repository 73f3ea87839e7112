//! # Tasklane Core
//!
//! Board state and ordering logic for Tasklane kanban boards.
//!
//! Tasks live in one flat ordered sequence; a column is the subsequence of
//! tasks whose status names it. [`Store`] owns that state and applies every
//! transition, including drag-and-drop moves, while [`TaskBoard`] writes
//! each applied change through to a [`Storage`] backend.

pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::{ReorderStrategy, StoreConfig};
pub use domain::{
    board::{Column, ColumnUpdate},
    due::{format_due_date, DueStatus},
    ids::{ColumnId, TagId, TaskId},
    priority::{Priority, PriorityLevel, PriorityUpdate},
    sorting::{sort_tasks, SortField, SortOrder},
    tag::{Tag, TagUpdate},
    task::{NewTask, Task, TaskUpdate},
};
pub use error::{Result, TasklaneError};
pub use service::TaskBoard;
pub use storage::{MemoryStorage, Storage};

#[cfg(feature = "file-storage")]
pub use storage::FileStorage;
pub use store::{
    BoardState, DropEvent, DropLocation, PersistedState, Store, StoreChange, SubscriptionId,
    TaskStats,
};

#[cfg(feature = "sqlite-storage")]
pub use storage::SqliteStorage;
