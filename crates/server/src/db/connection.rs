use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use super::{InMemoryTodoStore, TodoStore, dao::TodoDao, providers};
use crate::config::DatabaseConfig;

pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let backend = providers::DbBackendKind::from_url(&cfg.url)?;
    info!(
        backend = backend.as_str(),
        url = %providers::redact_url(&cfg.url),
        "connecting to database"
    );

    let db = providers::connect(backend, cfg).await?;

    info!("syncing database schema from entities");
    db.get_schema_registry("todo_tracker::db::entities::*")
        .sync(&db)
        .await?;
    Ok(db)
}

/// Picks the store for this process: the configured database, or the
/// in-memory store when no database section is present.
pub async fn open_store(cfg: Option<&DatabaseConfig>) -> anyhow::Result<Arc<dyn TodoStore>> {
    match cfg {
        Some(cfg) => {
            let db = connect(cfg).await?;
            Ok(Arc::new(TodoDao::new(&db)))
        }
        None => {
            warn!("no database configured; todos live in memory and vanish on restart");
            Ok(Arc::new(InMemoryTodoStore::new()))
        }
    }
}
