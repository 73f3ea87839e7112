//! Write-through board service.
//!
//! [`TaskBoard`] pairs a [`Store`] with a [`Storage`] backend and saves the
//! board snapshot after every call that changed it. Rejected calls and
//! positional no-ops never touch storage.

use crate::{
    config::StoreConfig,
    domain::{
        ColumnId, ColumnUpdate, NewTask, Priority, PriorityUpdate, TagId, TagUpdate, TaskId,
        TaskUpdate,
    },
    error::Result,
    storage::Storage,
    store::{BoardState, DropEvent, Store, StoreChange, SubscriptionId},
};
use tracing::{debug, info};

pub struct TaskBoard<S: Storage> {
    store: Store,
    storage: S,
    saved_revision: u64,
}

impl<S: Storage> TaskBoard<S> {
    /// Initializes the backend and rehydrates the board stored under the
    /// configured namespace, seeding and saving a fresh board when nothing
    /// is stored yet. A stored board that needed repairs on load is written
    /// back right away.
    pub async fn open(storage: S, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        storage.initialize().await?;

        let store = match storage.load_state(&config.namespace).await? {
            Some(persisted) => {
                info!(namespace = %config.namespace, "opened stored board");
                let store = Store::from_persisted(persisted.clone(), config)?;

                // Persist repairs made while loading
                let repaired = store.snapshot();
                if repaired != persisted {
                    storage
                        .save_state(&store.config().namespace, &repaired)
                        .await?;
                    info!(namespace = %store.config().namespace, "saved repaired board");
                }
                store
            }
            None => {
                let store = Store::new(config);
                storage
                    .save_state(&store.config().namespace, &store.snapshot())
                    .await?;
                info!(namespace = %store.config().namespace, "seeded new board");
                store
            }
        };

        let saved_revision = store.revision();
        Ok(Self {
            store,
            storage,
            saved_revision,
        })
    }

    /// Read access to the board
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Whether every applied change has been written to storage
    pub fn is_saved(&self) -> bool {
        self.saved_revision == self.store.revision()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreChange, &BoardState) + Send + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Writes the snapshot if the store moved past the last saved revision
    pub async fn save(&mut self) -> Result<()> {
        if self.is_saved() {
            return Ok(());
        }

        let namespace = &self.store.config().namespace;
        self.storage
            .save_state(namespace, &self.store.snapshot())
            .await?;
        self.saved_revision = self.store.revision();
        debug!(revision = self.saved_revision, "board saved");
        Ok(())
    }

    /// Replaces the in-memory board with what storage holds. Returns false
    /// when the namespace is empty, leaving the board untouched.
    pub async fn reload(&mut self) -> Result<bool> {
        let namespace = self.store.config().namespace.clone();
        let Some(persisted) = self.storage.load_state(&namespace).await? else {
            return Ok(false);
        };

        self.store.replace_state(persisted)?;
        self.saved_revision = self.store.revision();
        info!(namespace = %namespace, "reloaded board");
        Ok(true)
    }

    async fn persist_after<T>(&mut self, outcome: T) -> Result<T> {
        self.save().await?;
        Ok(outcome)
    }

    // Tasks

    pub async fn add_task(&mut self, new_task: NewTask) -> Result<TaskId> {
        let id = self.store.add_task(new_task)?;
        self.persist_after(id).await
    }

    pub async fn edit_task(&mut self, id: &TaskId, update: TaskUpdate) -> Result<()> {
        self.store.edit_task(id, update)?;
        self.save().await
    }

    pub async fn delete_task(&mut self, id: &TaskId) -> Result<()> {
        self.store.delete_task(id)?;
        self.save().await
    }

    pub async fn toggle_task_completion(&mut self, id: &TaskId) -> Result<bool> {
        let is_done = self.store.toggle_task_completion(id)?;
        self.persist_after(is_done).await
    }

    pub async fn complete_column(&mut self, column: &ColumnId) -> Result<usize> {
        let completed = self.store.complete_column(column)?;
        self.persist_after(completed).await
    }

    pub async fn move_task(&mut self, id: &TaskId, status: &ColumnId) -> Result<()> {
        self.store.move_task(id, status)?;
        self.save().await
    }

    pub async fn reorder_tasks(
        &mut self,
        source_index: usize,
        dest_index: usize,
        column: &ColumnId,
    ) -> Result<bool> {
        let moved = self.store.reorder_tasks(source_index, dest_index, column);
        self.persist_after(moved).await
    }

    pub async fn move_task_to_position(
        &mut self,
        task_id: &TaskId,
        source_column: &ColumnId,
        dest_column: &ColumnId,
        source_index: usize,
        dest_index: usize,
    ) -> Result<bool> {
        let moved = self.store.move_task_to_position(
            task_id,
            source_column,
            dest_column,
            source_index,
            dest_index,
        );
        self.persist_after(moved).await
    }

    pub async fn apply_drop(&mut self, event: &DropEvent) -> Result<bool> {
        let moved = self.store.apply_drop(event);
        self.persist_after(moved).await
    }

    // Columns

    pub async fn add_column(&mut self, title: &str, icon: &str, color: &str) -> Result<ColumnId> {
        let id = self.store.add_column(title, icon, color)?;
        self.persist_after(id).await
    }

    pub async fn edit_column(&mut self, id: &ColumnId, update: ColumnUpdate) -> Result<()> {
        self.store.edit_column(id, update)?;
        self.save().await
    }

    pub async fn delete_column(&mut self, id: &ColumnId) -> Result<()> {
        self.store.delete_column(id)?;
        self.save().await
    }

    pub async fn reorder_columns(&mut self, source_index: usize, dest_index: usize) -> Result<bool> {
        let moved = self.store.reorder_columns(source_index, dest_index);
        self.persist_after(moved).await
    }

    // Tags

    pub async fn add_tag(&mut self, name: &str, color: &str, icon: &str) -> Result<TagId> {
        let id = self.store.add_tag(name, color, icon)?;
        self.persist_after(id).await
    }

    pub async fn edit_tag(&mut self, id: &TagId, update: TagUpdate) -> Result<()> {
        self.store.edit_tag(id, update)?;
        self.save().await
    }

    pub async fn delete_tag(&mut self, id: &TagId) -> Result<()> {
        self.store.delete_tag(id)?;
        self.save().await
    }

    // Priorities

    pub async fn edit_priority(&mut self, priority: Priority, update: PriorityUpdate) -> Result<()> {
        self.store.edit_priority(priority, update)?;
        self.save().await
    }
}
