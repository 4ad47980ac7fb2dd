use actix_web::{web, HttpRequest, HttpResponse};
use metrics::counter;
use serde::Deserialize;

use gateway_admin_domain::model::{
    ChangeOperation, ConfigType, NewConfigHistory, NewRoute, RoutePatch,
};
use gateway_admin_domain::services::reference::{ensure_backend_enabled, ReferenceError};
use gateway_admin_domain::services::{audit, merge};
use gateway_admin_domain::storage::RouteStore;

use crate::state::AppState;

use super::{operator_identity, ApiError};

#[derive(Debug, Deserialize)]
pub struct ListRoutesQuery {
    pub enabled: Option<bool>,
}

pub async fn list_routes_handler(
    state: web::Data<AppState>,
    query: web::Query<ListRoutesQuery>,
) -> Result<HttpResponse, ApiError> {
    let routes = state.storage().list_routes(query.enabled).await?;
    Ok(HttpResponse::Ok().json(routes))
}

pub async fn get_route_handler(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let route = state
        .storage()
        .find_route(id)
        .await?
        .ok_or(ApiError::NotFound("route"))?;

    Ok(HttpResponse::Ok().json(route))
}

pub async fn create_route_handler(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<NewRoute>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    ensure_backend_enabled(state.storage(), &payload.backend_name)
        .await
        .inspect_err(|err| {
            if !matches!(err, ReferenceError::Storage(_)) {
                counter!("admin_config_mutations_total", "entity" => "route", "operation" => "create", "outcome" => "invalid_reference").increment(1);
            }
        })?;

    let created = state.storage().insert_route(payload).await?;
    audit::record_change(
        state.storage(),
        NewConfigHistory {
            config_type: ConfigType::Route,
            config_id: Some(created.id),
            operation: ChangeOperation::Create,
            old_value: None,
            new_value: audit::snapshot(&created),
            operator: operator_identity(&req),
        },
    )
    .await;

    counter!("admin_config_mutations_total", "entity" => "route", "operation" => "create", "outcome" => "ok").increment(1);
    Ok(HttpResponse::Created().json(created))
}

pub async fn update_route_handler(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    payload: web::Json<RoutePatch>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let existing = state
        .storage()
        .find_route(id)
        .await?
        .ok_or(ApiError::NotFound("route"))?;

    let update = merge::merge_route(&existing, payload.into_inner());
    update.validate()?;

    // Only a retarget is re-validated. A route already pointing at a backend
    // that has since been disabled may still change its other fields.
    if update.backend_name != existing.backend_name {
        ensure_backend_enabled(state.storage(), &update.backend_name)
            .await
            .inspect_err(|err| {
                if !matches!(err, ReferenceError::Storage(_)) {
                    counter!("admin_config_mutations_total", "entity" => "route", "operation" => "update", "outcome" => "invalid_reference").increment(1);
                }
            })?;
    }

    let updated = state
        .storage()
        .update_route(id, update)
        .await?
        .ok_or(ApiError::NotFound("route"))?;

    audit::record_change(
        state.storage(),
        NewConfigHistory {
            config_type: ConfigType::Route,
            config_id: Some(updated.id),
            operation: ChangeOperation::Update,
            old_value: audit::snapshot(&existing),
            new_value: audit::snapshot(&updated),
            operator: operator_identity(&req),
        },
    )
    .await;

    counter!("admin_config_mutations_total", "entity" => "route", "operation" => "update", "outcome" => "ok").increment(1);
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_route_handler(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let existing = state
        .storage()
        .find_route(id)
        .await?
        .ok_or(ApiError::NotFound("route"))?;

    let disabled = state
        .storage()
        .disable_route(id)
        .await?
        .ok_or(ApiError::NotFound("route"))?;

    audit::record_change(
        state.storage(),
        NewConfigHistory {
            config_type: ConfigType::Route,
            config_id: Some(disabled.id),
            operation: ChangeOperation::Delete,
            old_value: audit::snapshot(&existing),
            new_value: None,
            operator: operator_identity(&req),
        },
    )
    .await;

    counter!("admin_config_mutations_total", "entity" => "route", "operation" => "delete", "outcome" => "ok").increment(1);
    Ok(HttpResponse::NoContent().finish())
}
