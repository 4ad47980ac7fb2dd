pub mod backend;
pub mod health;
pub mod history;
pub mod metrics;
pub mod route;

pub use backend::{
    create_backend_handler, delete_backend_handler, get_backend_handler, list_backends_handler,
    update_backend_handler,
};
pub use health::health_handler;
pub use history::list_history_handler;
pub use metrics::metrics_handler;
pub use route::{
    create_route_handler, delete_route_handler, get_route_handler, list_routes_handler,
    update_route_handler,
};

use actix_web::{http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use gateway_admin_domain::model::ValidationError;
use gateway_admin_domain::services::reference::ReferenceError;
use gateway_admin_domain::storage::StorageError;

/// Header carrying the identity of the operator performing a change.
pub const OPERATOR_HEADER: &str = "X-Operator";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    InvalidReference(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(detail) => ApiError::Conflict(detail),
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl From<ReferenceError> for ApiError {
    fn from(err: ReferenceError) -> Self {
        match err {
            ReferenceError::Storage(inner) => inner.into(),
            other => ApiError::InvalidReference(other.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidReference(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Caller identity from the `X-Operator` header. Blank values count as absent.
pub(crate) fn operator_identity(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(OPERATOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
