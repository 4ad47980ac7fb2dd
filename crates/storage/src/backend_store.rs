use chrono::Utc;
use gateway_admin_domain::model::{Backend, BackendUpdate, NewBackend};
use gateway_admin_domain::storage::{BackendStore, StorageResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::backends;
use crate::errors::{map_insert_err, StorageError};
use crate::SeaOrmStorage;

#[async_trait::async_trait]
impl BackendStore for SeaOrmStorage {
    async fn list_backends(&self, enabled: Option<bool>) -> StorageResult<Vec<Backend>> {
        let mut select = backends::Entity::find().order_by_asc(backends::Column::Name);
        if let Some(want) = enabled {
            select = select.filter(backends::Column::Enabled.eq(want));
        }
        let models = select
            .all(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        Ok(models.into_iter().map(backend_to_record).collect())
    }

    async fn find_backend(&self, name: &str) -> StorageResult<Option<Backend>> {
        let maybe = backends::Entity::find()
            .filter(backends::Column::Name.eq(name))
            .one(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        Ok(maybe.map(backend_to_record))
    }

    async fn insert_backend(&self, backend: NewBackend) -> StorageResult<Backend> {
        let now = Utc::now();
        let model = backends::ActiveModel {
            name: Set(backend.name),
            addr: Set(backend.addr),
            description: Set(backend.description),
            enabled: Set(backend.enabled),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = model.insert(self.connection()).await.map_err(map_insert_err)?;
        Ok(backend_to_record(created))
    }

    async fn update_backend(
        &self,
        name: &str,
        update: BackendUpdate,
    ) -> StorageResult<Option<Backend>> {
        let maybe = backends::Entity::find()
            .filter(backends::Column::Name.eq(name))
            .one(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        let Some(model) = maybe else {
            return Ok(None);
        };

        let mut active: backends::ActiveModel = model.into();
        active.addr = Set(update.addr);
        active.description = Set(update.description);
        active.enabled = Set(update.enabled);
        active.updated_at = Set(Utc::now());
        let updated = active
            .update(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        Ok(Some(backend_to_record(updated)))
    }

    async fn disable_backend(&self, name: &str) -> StorageResult<Option<Backend>> {
        let maybe = backends::Entity::find()
            .filter(backends::Column::Name.eq(name))
            .one(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        let Some(model) = maybe else {
            return Ok(None);
        };

        if !model.enabled {
            return Ok(Some(backend_to_record(model)));
        }

        let mut active: backends::ActiveModel = model.into();
        active.enabled = Set(false);
        active.updated_at = Set(Utc::now());
        let updated = active
            .update(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        Ok(Some(backend_to_record(updated)))
    }
}

fn backend_to_record(model: backends::Model) -> Backend {
    Backend {
        id: model.id,
        name: model.name,
        addr: model.addr,
        description: model.description,
        enabled: model.enabled,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
