use actix_web::{web, HttpRequest, HttpResponse};
use metrics::counter;
use serde::Deserialize;

use gateway_admin_domain::model::{
    BackendPatch, ChangeOperation, ConfigType, NewBackend, NewConfigHistory,
};
use gateway_admin_domain::services::{audit, merge};
use gateway_admin_domain::storage::BackendStore;

use crate::state::AppState;

use super::{operator_identity, ApiError};

#[derive(Debug, Deserialize)]
pub struct ListBackendsQuery {
    pub enabled: Option<bool>,
}

pub async fn list_backends_handler(
    state: web::Data<AppState>,
    query: web::Query<ListBackendsQuery>,
) -> Result<HttpResponse, ApiError> {
    let backends = state.storage().list_backends(query.enabled).await?;
    Ok(HttpResponse::Ok().json(backends))
}

pub async fn get_backend_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let name = path.into_inner();
    let backend = state
        .storage()
        .find_backend(&name)
        .await?
        .ok_or(ApiError::NotFound("backend"))?;

    Ok(HttpResponse::Ok().json(backend))
}

pub async fn create_backend_handler(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Json<NewBackend>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    // The unique index on `name` still catches racing writers; this check
    // turns the common case into a clean conflict before touching the table.
    if state.storage().find_backend(&payload.name).await?.is_some() {
        counter!("admin_config_mutations_total", "entity" => "backend", "operation" => "create", "outcome" => "conflict").increment(1);
        return Err(ApiError::Conflict(format!(
            "backend `{}` already exists",
            payload.name
        )));
    }

    let created = state.storage().insert_backend(payload).await?;
    audit::record_change(
        state.storage(),
        NewConfigHistory {
            config_type: ConfigType::Backend,
            config_id: Some(created.id),
            operation: ChangeOperation::Create,
            old_value: None,
            new_value: audit::snapshot(&created),
            operator: operator_identity(&req),
        },
    )
    .await;

    counter!("admin_config_mutations_total", "entity" => "backend", "operation" => "create", "outcome" => "ok").increment(1);
    Ok(HttpResponse::Created().json(created))
}

pub async fn update_backend_handler(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<BackendPatch>,
) -> Result<HttpResponse, ApiError> {
    let name = path.into_inner();
    let existing = state
        .storage()
        .find_backend(&name)
        .await?
        .ok_or(ApiError::NotFound("backend"))?;

    let update = merge::merge_backend(&existing, payload.into_inner());
    update.validate()?;

    let updated = state
        .storage()
        .update_backend(&name, update)
        .await?
        .ok_or(ApiError::NotFound("backend"))?;

    audit::record_change(
        state.storage(),
        NewConfigHistory {
            config_type: ConfigType::Backend,
            config_id: Some(updated.id),
            operation: ChangeOperation::Update,
            old_value: audit::snapshot(&existing),
            new_value: audit::snapshot(&updated),
            operator: operator_identity(&req),
        },
    )
    .await;

    counter!("admin_config_mutations_total", "entity" => "backend", "operation" => "update", "outcome" => "ok").increment(1);
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_backend_handler(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let name = path.into_inner();
    let existing = state
        .storage()
        .find_backend(&name)
        .await?
        .ok_or(ApiError::NotFound("backend"))?;

    let disabled = state
        .storage()
        .disable_backend(&name)
        .await?
        .ok_or(ApiError::NotFound("backend"))?;

    audit::record_change(
        state.storage(),
        NewConfigHistory {
            config_type: ConfigType::Backend,
            config_id: Some(disabled.id),
            operation: ChangeOperation::Delete,
            old_value: audit::snapshot(&existing),
            new_value: None,
            operator: operator_identity(&req),
        },
    )
    .await;

    counter!("admin_config_mutations_total", "entity" => "backend", "operation" => "delete", "outcome" => "ok").increment(1);
    Ok(HttpResponse::NoContent().finish())
}
