use std::sync::Arc;

use axum::{Router, middleware};

use crate::{
    error::AppError,
    middleware::{catch_panic_layer, json_error_middleware},
    state::AppState,
};

use super::{health, todos};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(todos::router(state))
        .fallback(route_not_found)
}

/// [`router`] wrapped in the error-envelope and panic layers. The binary adds
/// request tracing on top.
pub fn app(state: Arc<AppState>) -> Router {
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}
