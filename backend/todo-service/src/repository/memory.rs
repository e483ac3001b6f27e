use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use super::{RepositoryError, RepositoryResult, TodoRepository};
use crate::models::{Todo, TodoPatch};

#[derive(Debug, Default)]
struct Store {
    last_id: i64,
    todos: BTreeMap<i64, Todo>,
}

impl Store {
    fn next_free_id(&mut self) -> i64 {
        loop {
            self.last_id += 1;
            if !self.todos.contains_key(&self.last_id) {
                return self.last_id;
            }
        }
    }
}

/// In-process todo storage. Ids start at 1 and are never reused until [`clear`].
///
/// [`clear`]: InMemoryTodoRepository::clear
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    store: RwLock<Store>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every record and restart ids at 1
    pub fn clear(&self) {
        *self.store.write() = Store::default();
    }

    pub fn len(&self) -> usize {
        self.store.read().todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, todo: Todo) -> RepositoryResult<Todo> {
        let mut store = self.store.write();

        let id = match todo.id {
            0 => store.next_free_id(),
            id if id < 0 => return Err(RepositoryError::InvalidId(id)),
            id if store.todos.contains_key(&id) => return Err(RepositoryError::Duplicate(id)),
            id => id,
        };

        let stored = Todo { id, ..todo };
        store.todos.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Todo>> {
        Ok(self.store.read().todos.get(&id).cloned())
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Todo>> {
        Ok(self.store.read().todos.values().cloned().collect())
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> RepositoryResult<Todo> {
        let mut store = self.store.write();
        let existing = store
            .todos
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound(id))?;

        patch.apply_to(existing);
        Ok(existing.clone())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        self.store
            .write()
            .todos
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound(id))
    }
}
