use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    Backend, BackendUpdate, ConfigHistory, HistoryPage, HistoryQuery, NewBackend,
    NewConfigHistory, NewRoute, Route, RouteUpdate,
};

/// Common result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(String),
}

impl StorageError {
    pub fn from_source(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }
}

/// Persistence capabilities for backend records. Lookup misses are `Ok(None)`
/// rather than errors; only engine failures surface as `Err`.
#[async_trait]
pub trait BackendStore: Send + Sync {
    /// Lists backends ordered by name ascending, optionally filtered by
    /// enabled state.
    async fn list_backends(&self, enabled: Option<bool>) -> StorageResult<Vec<Backend>>;
    async fn find_backend(&self, name: &str) -> StorageResult<Option<Backend>>;
    /// Inserts a new backend, assigning its id and timestamps. A duplicate
    /// name surfaces as [`StorageError::Conflict`].
    async fn insert_backend(&self, backend: NewBackend) -> StorageResult<Backend>;
    /// Applies a merged update to the named backend, refreshing `updated_at`.
    /// `name` and `id` are untouched.
    async fn update_backend(
        &self,
        name: &str,
        update: BackendUpdate,
    ) -> StorageResult<Option<Backend>>;
    /// Soft-deletes the named backend. Repeatable while the row exists; the
    /// row itself is never removed.
    async fn disable_backend(&self, name: &str) -> StorageResult<Option<Backend>>;
}

/// Persistence capabilities for route records, keyed by id.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Lists routes ordered by `(http_method, http_pattern)` ascending,
    /// optionally filtered by enabled state.
    async fn list_routes(&self, enabled: Option<bool>) -> StorageResult<Vec<Route>>;
    async fn find_route(&self, id: i32) -> StorageResult<Option<Route>>;
    /// Inserts a new route, assigning its id and timestamps. A non-positive
    /// `timeout_ms` is stored as the default instead.
    async fn insert_route(&self, route: NewRoute) -> StorageResult<Route>;
    /// Applies a merged update to the route, refreshing `updated_at`. The
    /// update is expected to carry an already-normalized timeout.
    async fn update_route(&self, id: i32, update: RouteUpdate) -> StorageResult<Option<Route>>;
    async fn disable_route(&self, id: i32) -> StorageResult<Option<Route>>;
}

/// Append-only persistence for the audit trail.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append_history(&self, entry: NewConfigHistory) -> StorageResult<ConfigHistory>;
    /// Runs a filtered, paginated query, newest first. `total` counts the
    /// whole filtered set regardless of the page bounds.
    async fn list_history(&self, query: HistoryQuery) -> StorageResult<HistoryPage>;
}
