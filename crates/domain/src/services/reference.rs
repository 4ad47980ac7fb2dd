//! Referential checks between routes and the backends they target.

use thiserror::Error;

use crate::model::Backend;
use crate::storage::{BackendStore, StorageError};

/// Raised when a route references a backend that cannot serve it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("backend `{0}` does not exist")]
    UnknownBackend(String),
    #[error("backend `{0}` is disabled")]
    BackendDisabled(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Resolves the named backend and requires it to be present and enabled.
///
/// Runs on route creation, and on route update only when the merged
/// `backend_name` differs from the stored one. A failure here aborts before
/// any mutation, so no route row and no history entry is produced.
pub async fn ensure_backend_enabled<S>(store: &S, name: &str) -> Result<Backend, ReferenceError>
where
    S: BackendStore + ?Sized,
{
    let backend = store
        .find_backend(name)
        .await?
        .ok_or_else(|| ReferenceError::UnknownBackend(name.to_string()))?;
    if !backend.enabled {
        return Err(ReferenceError::BackendDisabled(backend.name));
    }
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BackendUpdate, NewBackend};
    use crate::storage::StorageResult;
    use async_trait::async_trait;
    use chrono::Utc;

    struct StubBackendStore {
        backends: Vec<Backend>,
        fail_lookups: bool,
    }

    impl StubBackendStore {
        fn with(backends: Vec<Backend>) -> Self {
            Self {
                backends,
                fail_lookups: false,
            }
        }

        fn failing() -> Self {
            Self {
                backends: Vec::new(),
                fail_lookups: true,
            }
        }
    }

    #[async_trait]
    impl BackendStore for StubBackendStore {
        async fn list_backends(&self, enabled: Option<bool>) -> StorageResult<Vec<Backend>> {
            Ok(self
                .backends
                .iter()
                .filter(|b| enabled.map_or(true, |want| b.enabled == want))
                .cloned()
                .collect())
        }

        async fn find_backend(&self, name: &str) -> StorageResult<Option<Backend>> {
            if self.fail_lookups {
                return Err(StorageError::Database("stubbed outage".into()));
            }
            Ok(self.backends.iter().find(|b| b.name == name).cloned())
        }

        async fn insert_backend(&self, _backend: NewBackend) -> StorageResult<Backend> {
            Err(StorageError::Database("stub is read-only".into()))
        }

        async fn update_backend(
            &self,
            _name: &str,
            _update: BackendUpdate,
        ) -> StorageResult<Option<Backend>> {
            Err(StorageError::Database("stub is read-only".into()))
        }

        async fn disable_backend(&self, _name: &str) -> StorageResult<Option<Backend>> {
            Err(StorageError::Database("stub is read-only".into()))
        }
    }

    fn backend(name: &str, enabled: bool) -> Backend {
        Backend {
            id: 1,
            name: name.into(),
            addr: "127.0.0.1:50051".into(),
            description: None,
            enabled,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn enabled_backend_passes() {
        let store = StubBackendStore::with(vec![backend("account", true)]);
        let resolved = ensure_backend_enabled(&store, "account").await.unwrap();
        assert_eq!(resolved.name, "account");
    }

    #[tokio::test]
    async fn missing_backend_is_rejected() {
        let store = StubBackendStore::with(vec![]);
        let err = ensure_backend_enabled(&store, "account").await.unwrap_err();
        assert_eq!(err, ReferenceError::UnknownBackend("account".into()));
    }

    #[tokio::test]
    async fn disabled_backend_is_rejected() {
        let store = StubBackendStore::with(vec![backend("account", false)]);
        let err = ensure_backend_enabled(&store, "account").await.unwrap_err();
        assert_eq!(err, ReferenceError::BackendDisabled("account".into()));
    }

    #[tokio::test]
    async fn storage_failure_propagates_untranslated() {
        let store = StubBackendStore::failing();
        let err = ensure_backend_enabled(&store, "account").await.unwrap_err();
        assert!(matches!(err, ReferenceError::Storage(_)));
    }
}
