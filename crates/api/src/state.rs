use gateway_admin_domain::services::telemetry::TelemetryGuard;
use gateway_admin_storage::SeaOrmStorage;

#[derive(Clone)]
pub struct AppState {
    storage: SeaOrmStorage,
    telemetry: TelemetryGuard,
}

impl AppState {
    pub fn new(storage: SeaOrmStorage, telemetry: TelemetryGuard) -> Self {
        Self { storage, telemetry }
    }

    pub fn storage(&self) -> &SeaOrmStorage {
        &self.storage
    }

    pub fn telemetry(&self) -> &TelemetryGuard {
        &self.telemetry
    }
}
