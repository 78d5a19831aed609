use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

use super::pool_options;
use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn sqlite_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut options = pool_options(cfg);
    if is_memory_url(&cfg.url) {
        // the database lives and dies with its single connection
        options
            .max_connections(1)
            .min_connections(1)
            .max_lifetime(None)
            .idle_timeout(None);
    }
    options
}

pub(super) async fn connect(cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
    let db = Database::connect(sqlite_options(cfg)).await?;
    db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
        .await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::{is_memory_url, sqlite_options};
    use crate::config::DatabaseConfig;

    #[test]
    fn detects_memory_urls() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://todos?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://./todos.db?mode=rwc"));
    }

    fn never_expires(rendered: String) -> bool {
        rendered == "None" || rendered == "Some(None)"
    }

    #[test]
    fn memory_pool_keeps_its_only_connection() {
        let options = sqlite_options(&DatabaseConfig::new("sqlite::memory:"));

        assert_eq!(options.get_max_connections(), Some(1));
        assert_eq!(options.get_min_connections(), Some(1));
        assert!(never_expires(format!("{:?}", options.get_max_lifetime())));
        assert!(never_expires(format!("{:?}", options.get_idle_timeout())));
    }

    #[test]
    fn file_pool_uses_configured_bounds() {
        let mut cfg = DatabaseConfig::new("sqlite://./todos.db?mode=rwc");
        cfg.max_connections = 4;
        let options = sqlite_options(&cfg);

        assert_eq!(options.get_max_connections(), Some(4));
    }
}
