use std::sync::Arc;

use crate::{auth::jwt::JwtKeys, config::AppConfig, db::TodoStore};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub jwt: JwtKeys,
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn TodoStore>) -> Arc<Self> {
        let jwt = JwtKeys::from_secret(config.auth.jwt_secret.as_bytes());
        Arc::new(Self { config, jwt, store })
    }
}
