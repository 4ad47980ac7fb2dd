//! SeaORM-backed storage adapters that satisfy the domain storage traits while
//! keeping the database backend swappable (SQLite by default, PostgreSQL via
//! feature flag).

mod backend_store;
mod entity;
mod errors;
mod history_store;
mod migration;
mod route_store;


use std::sync::Arc;
use std::time::Duration;

use errors::StorageError;
use gateway_admin_domain::storage::StorageResult;
use migration::run_migrations;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

const POOL_MAX_CONNECTIONS: u32 = 25;
const POOL_MIN_CONNECTIONS: u32 = 5;
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Shared storage handle used by the admin HTTP surface.
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmStorage {
    /// Connects to the provided database URL with a bounded pool and ensures
    /// the schema is present.
    pub async fn connect(database_url: &str) -> StorageResult<Self> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        if is_in_memory_sqlite(database_url) {
            // Every pooled connection opens its own private in-memory
            // database, so migration and queries must share one connection.
            options.max_connections(1).min_connections(1);
        } else {
            options
                .max_connections(POOL_MAX_CONNECTIONS)
                .min_connections(POOL_MIN_CONNECTIONS)
                .idle_timeout(POOL_IDLE_TIMEOUT);
        }
        options.sqlx_logging(false);

        let db = Database::connect(options)
            .await
            .map_err(StorageError::from_source)?;
        run_migrations(&db).await?;
        Ok(Self { db: Arc::new(db) })
    }

    pub(crate) fn connection(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }
}

fn is_in_memory_sqlite(url: &str) -> bool {
    url.starts_with("sqlite::memory:") || url.contains("mode=memory")
}
