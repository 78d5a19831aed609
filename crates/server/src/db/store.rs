use async_trait::async_trait;

use super::dao::DaoResult;
use super::entities::todo;

/// Fields a caller may choose when creating a todo. `completed` is not one of
/// them: every store inserts new rows as incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
}

/// Persistence seam for todos.
///
/// Each method is a single atomic step at the store. Implementations must not
/// split the read and the write of `toggle_completed`, nor the eligibility
/// check and the removal of `delete_completed`, across separate round trips
/// that another request could interleave with.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Every todo, in store order.
    async fn find_all(&self) -> DaoResult<Vec<todo::Model>>;

    async fn create(&self, new_todo: NewTodo) -> DaoResult<todo::Model>;

    /// Flips `completed` and returns the updated row, or `None` for an unknown id.
    async fn toggle_completed(&self, id: i32) -> DaoResult<Option<todo::Model>>;

    /// Removes the todo only if it exists and is completed. `false` covers
    /// both "no such id" and "not completed yet".
    async fn delete_completed(&self, id: i32) -> DaoResult<bool>;
}
