use actix_web::{middleware::Logger, web, App, HttpServer};
use thiserror::Error;
use tracing::info;

use gateway_admin_domain::config::{AdminConfig, ConfigError};
use gateway_admin_domain::services::telemetry::{init_telemetry, TelemetryConfig, TelemetryError};
use gateway_admin_storage::SeaOrmStorage;

use crate::{
    handlers::{
        create_backend_handler, create_route_handler, delete_backend_handler,
        delete_route_handler, get_backend_handler, get_route_handler, health_handler,
        list_backends_handler, list_history_handler, list_routes_handler, metrics_handler,
        update_backend_handler, update_route_handler,
    },
    state::AppState,
};

pub async fn run() -> Result<(), BootstrapError> {
    let config = AdminConfig::load_from_env()?;

    let telemetry_config = TelemetryConfig::from_env("ADMIN");
    let telemetry = init_telemetry(&telemetry_config)?;

    let storage = SeaOrmStorage::connect(config.database_url()).await?;
    let state = AppState::new(storage, telemetry);

    info!(bind = config.bind_address(), "starting admin server");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .configure(register_routes)
    })
    .bind(config.bind_address())?
    .run()
    .await?;

    Ok(())
}

/// Route table for the admin surface. Shared with the test harness so tests
/// exercise the same wiring the server runs.
pub(crate) fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/backends", web::get().to(list_backends_handler))
        .route("/api/v1/backends", web::post().to(create_backend_handler))
        .route("/api/v1/backends/{name}", web::get().to(get_backend_handler))
        .route(
            "/api/v1/backends/{name}",
            web::put().to(update_backend_handler),
        )
        .route(
            "/api/v1/backends/{name}",
            web::delete().to(delete_backend_handler),
        )
        .route("/api/v1/routes", web::get().to(list_routes_handler))
        .route("/api/v1/routes", web::post().to(create_route_handler))
        .route("/api/v1/routes/{id}", web::get().to(get_route_handler))
        .route("/api/v1/routes/{id}", web::put().to(update_route_handler))
        .route("/api/v1/routes/{id}", web::delete().to(delete_route_handler))
        .route("/api/v1/history", web::get().to(list_history_handler))
        .route("/health", web::get().to(health_handler))
        .route("/metrics", web::get().to(metrics_handler));
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("storage error: {0}")]
    Storage(#[from] gateway_admin_domain::storage::StorageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
