use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::dao::DaoResult;
use super::entities::todo;
use super::store::{NewTodo, TodoStore};

/// Process-local [`TodoStore`]. Used when no database is configured, and as
/// the substitute store in tests.
///
/// Each operation holds the write lock for its whole read-modify-write, which
/// gives the same atomicity the SQL store gets from its conditional statements.
#[derive(Default)]
pub struct InMemoryTodoStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_id: i32,
    rows: BTreeMap<i32, todo::Model>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn find_all(&self) -> DaoResult<Vec<todo::Model>> {
        let state = self.state.read().await;
        Ok(state.rows.values().cloned().collect())
    }

    async fn create(&self, new_todo: NewTodo) -> DaoResult<todo::Model> {
        let mut state = self.state.write().await;
        // ids only move forward, so a deleted id is never handed out again
        state.last_id += 1;
        let now = Utc::now().fixed_offset();
        let model = todo::Model {
            id: state.last_id,
            name: new_todo.name,
            description: new_todo.description,
            completed: false,
            owner_id: new_todo.owner_id,
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(model.id, model.clone());
        Ok(model)
    }

    async fn toggle_completed(&self, id: i32) -> DaoResult<Option<todo::Model>> {
        let mut state = self.state.write().await;
        let Some(row) = state.rows.get_mut(&id) else {
            return Ok(None);
        };
        row.completed = !row.completed;
        row.updated_at = Utc::now().fixed_offset();
        Ok(Some(row.clone()))
    }

    async fn delete_completed(&self, id: i32) -> DaoResult<bool> {
        let mut state = self.state.write().await;
        let eligible = state.rows.get(&id).is_some_and(|row| row.completed);
        if eligible {
            state.rows.remove(&id);
        }
        Ok(eligible)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::InMemoryTodoStore;
    use crate::db::store::{NewTodo, TodoStore};

    fn new_todo(name: &str) -> NewTodo {
        NewTodo {
            name: name.to_string(),
            description: None,
            owner_id: "owner-1".to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryTodoStore::new();
        let first = store.create(new_todo("first")).await.expect("create");
        store.toggle_completed(first.id).await.expect("toggle");
        assert!(store.delete_completed(first.id).await.expect("delete"));

        let second = store.create(new_todo("second")).await.expect("create");
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn delete_leaves_incomplete_rows_in_place() {
        let store = InMemoryTodoStore::new();
        let todo = store.create(new_todo("keep me")).await.expect("create");

        assert!(!store.delete_completed(todo.id).await.expect("delete"));
        assert_eq!(store.find_all().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn concurrent_toggles_each_apply_once() {
        let store = Arc::new(InMemoryTodoStore::new());
        let todo = store.create(new_todo("contended")).await.expect("create");

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.toggle_completed(todo.id).await })
            })
            .collect();
        for handle in handles {
            handle.await.expect("task").expect("toggle");
        }

        let rows = store.find_all().await.expect("list");
        assert!(!rows[0].completed, "an even number of toggles restores the value");
    }
}
