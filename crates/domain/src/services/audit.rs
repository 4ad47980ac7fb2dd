//! Best-effort recording of configuration changes.
//!
//! History rows are written after the primary mutation has committed. A
//! failure to record is logged and counted but never surfaces to the caller:
//! the trail is advisory, and a lost entry must not fail or retry an
//! operation that already succeeded.

use metrics::counter;
use serde::Serialize;
use tracing::warn;

use crate::model::NewConfigHistory;
use crate::storage::HistoryStore;

/// Serializes an entity view for a history snapshot. Serialization failure
/// degrades to an absent snapshot.
pub fn snapshot<T: Serialize>(entity: &T) -> Option<serde_json::Value> {
    serde_json::to_value(entity).ok()
}

/// Appends one audit row, swallowing storage failures.
pub async fn record_change<S>(store: &S, entry: NewConfigHistory)
where
    S: HistoryStore + ?Sized,
{
    let config_type = entry.config_type;
    let operation = entry.operation;
    if let Err(err) = store.append_history(entry).await {
        counter!(
            "admin_history_write_failures_total",
            "config_type" => config_type.as_ref().to_owned(),
            "operation" => operation.as_ref().to_owned(),
        )
        .increment(1);
        warn!(
            config_type = config_type.as_ref(),
            operation = operation.as_ref(),
            error = %err,
            "failed to record config history"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Backend, ChangeOperation, ConfigHistory, ConfigType, HistoryPage, HistoryQuery,
    };
    use crate::storage::{StorageError, StorageResult};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubHistoryStore {
        appended: Mutex<Vec<NewConfigHistory>>,
        fail_appends: bool,
    }

    #[async_trait]
    impl HistoryStore for StubHistoryStore {
        async fn append_history(&self, entry: NewConfigHistory) -> StorageResult<ConfigHistory> {
            if self.fail_appends {
                return Err(StorageError::Database("stubbed outage".into()));
            }
            let recorded = ConfigHistory {
                id: 1,
                config_type: entry.config_type,
                config_id: entry.config_id,
                operation: entry.operation,
                old_value: entry.old_value.clone(),
                new_value: entry.new_value.clone(),
                operator: entry.operator.clone(),
                created_at: Utc::now(),
            };
            self.appended.lock().unwrap().push(entry);
            Ok(recorded)
        }

        async fn list_history(&self, _query: HistoryQuery) -> StorageResult<HistoryPage> {
            Ok(HistoryPage {
                items: Vec::new(),
                total: 0,
            })
        }
    }

    fn sample_entry() -> NewConfigHistory {
        NewConfigHistory {
            config_type: ConfigType::Backend,
            config_id: Some(3),
            operation: ChangeOperation::Update,
            old_value: None,
            new_value: None,
            operator: Some("ops@example.com".into()),
        }
    }

    #[tokio::test]
    async fn successful_append_passes_the_entry_through() {
        let store = StubHistoryStore::default();
        record_change(&store, sample_entry()).await;

        let appended = store.appended.lock().unwrap();
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].operation, ChangeOperation::Update);
        assert_eq!(appended[0].config_id, Some(3));
    }

    #[tokio::test]
    async fn append_failure_is_swallowed() {
        let store = StubHistoryStore {
            fail_appends: true,
            ..StubHistoryStore::default()
        };
        record_change(&store, sample_entry()).await;
        assert!(store.appended.lock().unwrap().is_empty());
    }

    #[test]
    fn snapshot_serializes_entities() {
        let backend = Backend {
            id: 9,
            name: "account".into(),
            addr: "127.0.0.1:50051".into(),
            description: None,
            enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = snapshot(&backend).unwrap();
        assert_eq!(value["name"], "account");
        assert_eq!(value["enabled"], true);
    }
}
