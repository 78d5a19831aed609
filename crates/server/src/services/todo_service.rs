use std::sync::Arc;

use tracing::{error, info};

use crate::{
    db::{NewTodo, TodoStore, dao::DaoLayerError, entities::todo},
    error::AppError,
};

pub const TODO_NOT_FOUND: &str = "Todo not found";
pub const TODO_NOT_DELETABLE: &str = "Todo not found or not completed yet";
pub const NAME_REQUIRED: &str = "Todo name required";

/// Todo operations over an injected store.
///
/// The caller identity is passed in explicitly; nothing here reads request
/// state. Store failures are logged with their cause and surface as
/// [`AppError::Internal`] with a message that does not leak it.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<todo::Model>, AppError> {
        self.store
            .find_all()
            .await
            .map_err(|err| store_failure("list", err))
    }

    /// Creates an incomplete todo owned by `owner_id` and returns its id.
    pub async fn create(
        &self,
        owner_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<i32, AppError> {
        let name = normalize_name(name)?;
        let new_todo = NewTodo {
            name: name.to_string(),
            description: normalize_description(description),
            owner_id: owner_id.to_string(),
        };

        let created = self
            .store
            .create(new_todo)
            .await
            .map_err(|err| store_failure("create", err))?;
        info!(todo_id = created.id, owner = %created.owner_id, "todo created");
        Ok(created.id)
    }

    pub async fn toggle_completed(&self, todo_id: i32) -> Result<todo::Model, AppError> {
        self.store
            .toggle_completed(todo_id)
            .await
            .map_err(|err| store_failure("toggle", err))?
            .ok_or_else(|| AppError::not_found(TODO_NOT_FOUND))
    }

    /// Deletes the todo if, at the store, it exists and is completed.
    pub async fn delete_completed(&self, todo_id: i32) -> Result<(), AppError> {
        let deleted = self
            .store
            .delete_completed(todo_id)
            .await
            .map_err(|err| store_failure("delete", err))?;
        if !deleted {
            return Err(AppError::not_found(TODO_NOT_DELETABLE));
        }
        info!(todo_id, "todo deleted");
        Ok(())
    }
}

fn store_failure(operation: &'static str, err: DaoLayerError) -> AppError {
    error!(operation, error = %err, "todo store failure");
    AppError::from(err)
}

fn normalize_name(name: Option<&str>) -> Result<&str, AppError> {
    let trimmed = name.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(NAME_REQUIRED));
    }
    Ok(trimmed)
}

fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{NAME_REQUIRED, TODO_NOT_DELETABLE, TODO_NOT_FOUND, TodoService};
    use crate::{db::InMemoryTodoStore, error::AppError};

    fn service() -> TodoService {
        TodoService::new(Arc::new(InMemoryTodoStore::new()))
    }

    #[tokio::test]
    async fn create_binds_owner_and_starts_incomplete() {
        let service = service();
        let id = service
            .create("user-1", Some("A"), Some("B"))
            .await
            .expect("create should succeed");

        let todos = service.list().await.expect("list should succeed");
        let todo = todos.iter().find(|todo| todo.id == id).expect("todo listed");
        assert_eq!(todo.name, "A");
        assert_eq!(todo.description.as_deref(), Some("B"));
        assert_eq!(todo.owner_id, "user-1");
        assert!(!todo.completed);
    }

    #[tokio::test]
    async fn create_rejects_missing_or_blank_name() {
        let service = service();

        for name in [None, Some(""), Some("   ")] {
            let err = service
                .create("user-1", name, None)
                .await
                .expect_err("blank name should be rejected");
            assert!(matches!(err, AppError::BadRequest(_)));
            assert_eq!(err.message(), NAME_REQUIRED);
        }
        assert!(service.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn create_trims_name_and_drops_blank_description() {
        let service = service();
        let id = service
            .create("user-1", Some("  Buy milk "), Some("  "))
            .await
            .expect("create");

        let todos = service.list().await.expect("list");
        let todo = todos.iter().find(|todo| todo.id == id).expect("listed");
        assert_eq!(todo.name, "Buy milk");
        assert_eq!(todo.description, None);
    }

    #[tokio::test]
    async fn toggling_twice_restores_original_state() {
        let service = service();
        let id = service.create("user-1", Some("A"), None).await.expect("create");

        let once = service.toggle_completed(id).await.expect("first toggle");
        assert!(once.completed);
        let twice = service.toggle_completed(id).await.expect("second toggle");
        assert!(!twice.completed);
        assert_eq!(twice.name, "A");
        assert_eq!(twice.owner_id, "user-1");
    }

    #[tokio::test]
    async fn toggling_unknown_id_is_not_found_and_changes_nothing() {
        let service = service();
        service.create("user-1", Some("A"), None).await.expect("create");
        let before = service.list().await.expect("list");

        let err = service
            .toggle_completed(999)
            .await
            .expect_err("unknown id should fail");
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.message(), TODO_NOT_FOUND);
        assert_eq!(service.list().await.expect("list"), before);
    }

    #[tokio::test]
    async fn delete_requires_completion() {
        let service = service();
        let id = service.create("user-1", Some("A"), None).await.expect("create");

        let err = service
            .delete_completed(id)
            .await
            .expect_err("incomplete todo should not delete");
        assert_eq!(err.message(), TODO_NOT_DELETABLE);
        assert_eq!(service.list().await.expect("list").len(), 1);

        service.toggle_completed(id).await.expect("toggle");
        service.delete_completed(id).await.expect("delete");
        assert!(service.list().await.expect("list").is_empty());

        let again = service
            .delete_completed(id)
            .await
            .expect_err("second delete should fail");
        assert!(matches!(again, AppError::NotFound(_)));
    }
}
