use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// A todo as the service reports it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub completed: bool,
    pub owner_id: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Rejected { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Text fit for a one-line notice.
    pub fn notice(&self) -> String {
        match self {
            ApiError::Rejected { message, .. } => message.clone(),
            ApiError::Transport(err) => format!("Could not reach the server: {err}"),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The four todo operations the view needs.
#[async_trait]
pub trait TodoBackend: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<Todo>>;
    async fn create(&self, name: &str, description: Option<&str>) -> ApiResult<i32>;
    async fn toggle(&self, id: i32) -> ApiResult<Todo>;
    /// Returns the confirmation message from the service.
    async fn delete(&self, id: i32) -> ApiResult<String>;
}

#[derive(Debug, Serialize)]
struct CreateTodoRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TodosBody {
    todos: Vec<Todo>,
}

#[derive(Debug, Deserialize)]
struct CreatedBody {
    todo: i32,
}

#[derive(Debug, Deserialize)]
struct TodoBody {
    todo: Todo,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// HTTP implementation of [`TodoBackend`].
#[derive(Clone)]
pub struct TodoApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl TodoApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl TodoBackend for TodoApi {
    async fn list(&self) -> ApiResult<Vec<Todo>> {
        let response = self.request(Method::GET, "/todos").send().await?;
        let body: TodosBody = read_body(response).await?;
        Ok(body.todos)
    }

    async fn create(&self, name: &str, description: Option<&str>) -> ApiResult<i32> {
        let response = self
            .request(Method::POST, "/todos")
            .json(&CreateTodoRequest { name, description })
            .send()
            .await?;
        let body: CreatedBody = read_body(response).await?;
        Ok(body.todo)
    }

    async fn toggle(&self, id: i32) -> ApiResult<Todo> {
        let response = self
            .request(Method::PUT, &format!("/todos/{id}/completed"))
            .send()
            .await?;
        let body: TodoBody = read_body(response).await?;
        Ok(body.todo)
    }

    async fn delete(&self, id: i32) -> ApiResult<String> {
        let response = self
            .request(Method::DELETE, &format!("/todos/{id}"))
            .send()
            .await?;
        let body: MessageBody = read_body(response).await?;
        Ok(body.message)
    }
}

async fn read_body<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await?;
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message: rejection_message(status, &text),
    })
}

fn rejection_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<MessageBody>(body)
        .map(|body| body.message)
        .ok()
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}
