use chrono::Utc;
use gateway_admin_domain::model::{
    ChangeOperation, ConfigHistory, ConfigType, HistoryPage, HistoryQuery, NewConfigHistory,
};
use gateway_admin_domain::storage::{HistoryStore, StorageResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entity::config_history;
use crate::errors::StorageError;
use crate::SeaOrmStorage;

#[async_trait::async_trait]
impl HistoryStore for SeaOrmStorage {
    async fn append_history(&self, entry: NewConfigHistory) -> StorageResult<ConfigHistory> {
        let model = config_history::ActiveModel {
            config_type: Set(entry.config_type.as_ref().to_owned()),
            config_id: Set(entry.config_id),
            operation: Set(entry.operation.as_ref().to_owned()),
            old_value: Set(entry.old_value.map(|value| value.to_string())),
            new_value: Set(entry.new_value.map(|value| value.to_string())),
            operator: Set(entry.operator),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let created = model
            .insert(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        history_to_record(created)
    }

    async fn list_history(&self, query: HistoryQuery) -> StorageResult<HistoryPage> {
        let mut select = config_history::Entity::find();
        if let Some(config_type) = query.config_type {
            select = select.filter(config_history::Column::ConfigType.eq(config_type.as_ref()));
        }
        if let Some(config_id) = query.config_id {
            select = select.filter(config_history::Column::ConfigId.eq(config_id));
        }

        // The total covers the whole filtered set, not the requested page.
        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(StorageError::from_source)?;

        // Id breaks ties between rows created in the same instant.
        let models = select
            .order_by_desc(config_history::Column::CreatedAt)
            .order_by_desc(config_history::Column::Id)
            .limit(query.limit)
            .offset(query.offset)
            .all(self.connection())
            .await
            .map_err(StorageError::from_source)?;

        let items = models
            .into_iter()
            .map(history_to_record)
            .collect::<StorageResult<Vec<_>>>()?;
        Ok(HistoryPage { items, total })
    }
}

fn history_to_record(model: config_history::Model) -> StorageResult<ConfigHistory> {
    let config_type = model.config_type.parse::<ConfigType>().map_err(|_| {
        StorageError::Database(format!("unknown config_type `{}`", model.config_type))
    })?;
    let operation = model.operation.parse::<ChangeOperation>().map_err(|_| {
        StorageError::Database(format!("unknown operation `{}`", model.operation))
    })?;

    Ok(ConfigHistory {
        id: model.id,
        config_type,
        config_id: model.config_id,
        operation,
        old_value: parse_snapshot(model.old_value)?,
        new_value: parse_snapshot(model.new_value)?,
        operator: model.operator,
        created_at: model.created_at,
    })
}

fn parse_snapshot(raw: Option<String>) -> StorageResult<Option<serde_json::Value>> {
    raw.map(|text| {
        serde_json::from_str(&text)
            .map_err(|err| StorageError::Database(format!("malformed snapshot: {err}")))
    })
    .transpose()
}
