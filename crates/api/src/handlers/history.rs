use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use gateway_admin_domain::model::{ConfigHistory, ConfigType, HistoryQuery};
use gateway_admin_domain::storage::HistoryStore;

use crate::state::AppState;

use super::ApiError;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub config_type: Option<ConfigType>,
    pub config_id: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Page envelope echoing the limit and offset actually applied, which may
/// differ from the raw query when the caller sent out-of-range values.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryEnvelope {
    pub items: Vec<ConfigHistory>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

pub async fn list_history_handler(
    state: web::Data<AppState>,
    params: web::Query<HistoryParams>,
) -> Result<HttpResponse, ApiError> {
    let params = params.into_inner();
    let query = HistoryQuery::new(
        params.config_type,
        params.config_id,
        params.limit,
        params.offset,
    );
    let (limit, offset) = (query.limit, query.offset);

    let page = state.storage().list_history(query).await?;
    Ok(HttpResponse::Ok().json(HistoryEnvelope {
        items: page.items,
        total: page.total,
        limit,
        offset,
    }))
}
