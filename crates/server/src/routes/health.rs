use axum::{Router, routing::get};

use crate::response::{ApiResult, JsonApiResponse, MessageBody};

pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> ApiResult<MessageBody> {
    JsonApiResponse::ok(MessageBody::new("ok"))
}
