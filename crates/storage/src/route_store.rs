use chrono::Utc;
use gateway_admin_domain::model::{effective_timeout_ms, NewRoute, Route, RouteUpdate};
use gateway_admin_domain::storage::{RouteStore, StorageResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::routes;
use crate::errors::{map_insert_err, StorageError};
use crate::SeaOrmStorage;

#[async_trait::async_trait]
impl RouteStore for SeaOrmStorage {
    async fn list_routes(&self, enabled: Option<bool>) -> StorageResult<Vec<Route>> {
        let mut select = routes::Entity::find()
            .order_by_asc(routes::Column::HttpMethod)
            .order_by_asc(routes::Column::HttpPattern);
        if let Some(want) = enabled {
            select = select.filter(routes::Column::Enabled.eq(want));
        }
        let models = select
            .all(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        Ok(models.into_iter().map(route_to_record).collect())
    }

    async fn find_route(&self, id: i32) -> StorageResult<Option<Route>> {
        let maybe = routes::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        Ok(maybe.map(route_to_record))
    }

    async fn insert_route(&self, route: NewRoute) -> StorageResult<Route> {
        let now = Utc::now();
        let model = routes::ActiveModel {
            http_method: Set(route.http_method),
            http_pattern: Set(route.http_pattern),
            backend_name: Set(route.backend_name),
            backend_service: Set(route.backend_service),
            backend_method: Set(route.backend_method),
            timeout_ms: Set(effective_timeout_ms(route.timeout_ms)),
            description: Set(route.description),
            enabled: Set(route.enabled),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = model.insert(self.connection()).await.map_err(map_insert_err)?;
        Ok(route_to_record(created))
    }

    async fn update_route(&self, id: i32, update: RouteUpdate) -> StorageResult<Option<Route>> {
        let maybe = routes::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        let Some(model) = maybe else {
            return Ok(None);
        };

        let mut active: routes::ActiveModel = model.into();
        active.http_method = Set(update.http_method);
        active.http_pattern = Set(update.http_pattern);
        active.backend_name = Set(update.backend_name);
        active.backend_service = Set(update.backend_service);
        active.backend_method = Set(update.backend_method);
        active.timeout_ms = Set(update.timeout_ms);
        active.description = Set(update.description);
        active.enabled = Set(update.enabled);
        active.updated_at = Set(Utc::now());
        let updated = active
            .update(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        Ok(Some(route_to_record(updated)))
    }

    async fn disable_route(&self, id: i32) -> StorageResult<Option<Route>> {
        let maybe = routes::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        let Some(model) = maybe else {
            return Ok(None);
        };

        if !model.enabled {
            return Ok(Some(route_to_record(model)));
        }

        let mut active: routes::ActiveModel = model.into();
        active.enabled = Set(false);
        active.updated_at = Set(Utc::now());
        let updated = active
            .update(self.connection())
            .await
            .map_err(StorageError::from_source)?;
        Ok(Some(route_to_record(updated)))
    }
}

fn route_to_record(model: routes::Model) -> Route {
    Route {
        id: model.id,
        http_method: model.http_method,
        http_pattern: model.http_pattern,
        backend_name: model.backend_name,
        backend_service: model.backend_service,
        backend_method: model.backend_method,
        timeout_ms: model.timeout_ms,
        description: model.description,
        enabled: model.enabled,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
