use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, put},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    db::entities::todo,
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse, MessageBody},
    services::{ServiceContext, TodoService},
    state::AppState,
};

/// Body of `POST /todos`. Any other field (`completed`, `ownerId`, ...) is
/// ignored; the server decides those.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub completed: bool,
    pub owner_id: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Serialize)]
pub struct TodosBody {
    pub todos: Vec<TodoResponse>,
}

#[derive(Debug, Serialize)]
pub struct CreatedBody {
    pub todo: i32,
}

#[derive(Debug, Serialize)]
pub struct TodoBody {
    pub todo: TodoResponse,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{todo_id}/completed", put(toggle_todo))
        .route("/todos/{todo_id}", delete(delete_todo))
        .with_state(state)
}

async fn list_todos(State(state): State<Arc<AppState>>, _auth: AuthGuard) -> ApiResult<TodosBody> {
    let todos = todo_service_from_state(state.as_ref()).list().await?;
    JsonApiResponse::ok(TodosBody {
        todos: todos.into_iter().map(TodoResponse::from).collect(),
    })
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    auth: AuthGuard,
    Json(body): Json<CreateTodoRequest>,
) -> ApiResult<CreatedBody> {
    let id = todo_service_from_state(state.as_ref())
        .create(
            auth.subject(),
            body.name.as_deref(),
            body.description.as_deref(),
        )
        .await?;
    JsonApiResponse::created(CreatedBody { todo: id })
}

async fn toggle_todo(
    State(state): State<Arc<AppState>>,
    _auth: AuthGuard,
    Path(todo_id): Path<i32>,
) -> ApiResult<TodoBody> {
    let todo = todo_service_from_state(state.as_ref())
        .toggle_completed(todo_id)
        .await?;
    JsonApiResponse::ok(TodoBody { todo: todo.into() })
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    _auth: AuthGuard,
    Path(todo_id): Path<i32>,
) -> ApiResult<MessageBody> {
    todo_service_from_state(state.as_ref())
        .delete_completed(todo_id)
        .await?;
    JsonApiResponse::ok(MessageBody::new(format!("Todo with ID {todo_id} deleted")))
}

impl From<todo::Model> for TodoResponse {
    fn from(model: todo::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            completed: model.completed,
            owner_id: model.owner_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn todo_service_from_state(state: &AppState) -> TodoService {
    ServiceContext::from_state(state).todo()
}
