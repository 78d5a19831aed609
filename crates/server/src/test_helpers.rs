use std::sync::Arc;

use axum::Router;

use crate::{
    auth::jwt::{encode_token, make_access_claims},
    config::AppConfig,
    db::{InMemoryTodoStore, TodoStore},
    routes::app,
    state::AppState,
};

pub const TEST_SUBJECT: &str = "test-user";

/// State over a fresh in-memory store with default config.
pub fn memory_state() -> Arc<AppState> {
    state_with_store(Arc::new(InMemoryTodoStore::new()))
}

pub fn state_with_store(store: Arc<dyn TodoStore>) -> Arc<AppState> {
    AppState::new(AppConfig::default(), store)
}

/// The full application (routes plus error and panic layers) over a fresh
/// in-memory store.
pub fn test_app() -> Router {
    app(memory_state())
}

/// `Authorization` header value for `subject`, signed with the state's key.
pub fn bearer_for(state: &AppState, subject: &str) -> String {
    let claims = make_access_claims(subject, 3600);
    match encode_token(&state.jwt, &claims) {
        Ok(token) => format!("Bearer {token}"),
        Err(err) => panic!("test token should encode: {err}"),
    }
}
