use crate::domain::{ColumnId, Priority, TagId, TaskId};
use crate::store::state::BoardState;
use serde::Serialize;
use std::fmt;

/// A transition the store has applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StoreChange {
    TaskAdded {
        task_id: TaskId,
    },
    TaskUpdated {
        task_id: TaskId,
    },
    TaskDeleted {
        task_id: TaskId,
    },
    TaskMoved {
        task_id: TaskId,
        from: ColumnId,
        to: ColumnId,
    },
    TasksReordered {
        column_id: ColumnId,
    },
    ColumnAdded {
        column_id: ColumnId,
    },
    ColumnUpdated {
        column_id: ColumnId,
    },
    ColumnDeleted {
        column_id: ColumnId,
        reassigned_to: ColumnId,
        reassigned: usize,
    },
    ColumnsReordered,
    ColumnCompleted {
        column_id: ColumnId,
        completed: usize,
    },
    TagAdded {
        tag_id: TagId,
    },
    TagUpdated {
        tag_id: TagId,
    },
    TagDeleted {
        tag_id: TagId,
    },
    PriorityUpdated {
        priority: Priority,
    },
    StateReplaced,
}

/// Callback invoked after every applied transition
pub type Listener = Box<dyn FnMut(&StoreChange, &BoardState) + Send>;

/// Handle returned by `Store::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub(crate) fn notify(&mut self, change: &StoreChange, state: &BoardState) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(change, state);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_subscribers_notify_and_remove() {
        let state = BoardState::seeded(&StoreConfig::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut subscribers = Subscribers::default();

        let sink = Arc::clone(&seen);
        let id = subscribers.add(Box::new(move |change, _| {
            sink.lock().unwrap().push(change.clone());
        }));

        subscribers.notify(&StoreChange::ColumnsReordered, &state);
        assert_eq!(seen.lock().unwrap().len(), 1);

        assert!(subscribers.remove(id));
        assert!(!subscribers.remove(id));

        subscribers.notify(&StoreChange::ColumnsReordered, &state);
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(subscribers.len(), 0);
    }

    #[test]
    fn test_change_serializes_with_type_tag() {
        let change = StoreChange::TaskMoved {
            task_id: TaskId::from("t1"),
            from: ColumnId::from("todo"),
            to: ColumnId::from("done"),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["type"], "taskMoved");
        assert_eq!(json["taskId"], "t1");
        assert_eq!(json["to"], "done");
        assert!(json.get("task_id").is_none());

        let deleted = StoreChange::ColumnDeleted {
            column_id: ColumnId::from("doing"),
            reassigned_to: ColumnId::from("todo"),
            reassigned: 2,
        };
        let json = serde_json::to_value(&deleted).unwrap();
        assert_eq!(json["columnId"], "doing");
        assert_eq!(json["reassignedTo"], "todo");
    }
}
