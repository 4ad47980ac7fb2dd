//! Data structures and helpers shared across the admin API and storage crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Timeout applied to a route whenever the request leaves it unset or
/// non-positive.
pub const DEFAULT_TIMEOUT_MS: i32 = 5000;

/// Page size used when a history query does not request one.
pub const DEFAULT_PAGE_LIMIT: u64 = 50;

/// Largest page size a history query may request.
pub const MAX_PAGE_LIMIT: u64 = 100;

/// A named upstream service endpoint. `name` is the lookup key and never
/// changes after creation; deletion flips `enabled` instead of removing the
/// row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backend {
    pub id: i32,
    pub name: String,
    pub addr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A mapping from an inbound HTTP method + path pattern to an outbound
/// backend RPC call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: i32,
    pub http_method: String,
    pub http_pattern: String,
    pub backend_name: String,
    pub backend_service: String,
    pub backend_method: String,
    pub timeout_ms: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Entity kind recorded in the audit trail.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConfigType {
    Backend,
    Route,
}

/// Mutation kind recorded in the audit trail.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ChangeOperation {
    Create,
    Update,
    Delete,
}

/// One immutable audit record. `old_value`/`new_value` are opaque snapshots
/// of the entity before/after the mutation; the side that does not apply is
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigHistory {
    pub id: i64,
    pub config_type: ConfigType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<i32>,
    pub operation: ChangeOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Creation payload for a backend. `enabled` defaults to true when the
/// request omits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBackend {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub addr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl NewBackend {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_field("name", &self.name)?;
        require_field("addr", &self.addr)?;
        Ok(())
    }
}

/// Creation payload for a route. An omitted `timeout_ms` decodes to zero and
/// is normalized by [`effective_timeout_ms`] before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoute {
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub http_pattern: String,
    #[serde(default)]
    pub backend_name: String,
    #[serde(default)]
    pub backend_service: String,
    #[serde(default)]
    pub backend_method: String,
    #[serde(default)]
    pub timeout_ms: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl NewRoute {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_field("http_method", &self.http_method)?;
        require_field("http_pattern", &self.http_pattern)?;
        require_field("backend_name", &self.backend_name)?;
        require_field("backend_service", &self.backend_service)?;
        require_field("backend_method", &self.backend_method)?;
        Ok(())
    }
}

/// Partial-update payload for a backend. `None` means the field was omitted
/// and the stored value is preserved; `Some` applies the new value, including
/// `Some(false)` for `enabled`. Identity fields are not representable here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BackendPatch {
    pub addr: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
}

/// Partial-update payload for a route, with the same presence semantics as
/// [`BackendPatch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoutePatch {
    pub http_method: Option<String>,
    pub http_pattern: Option<String>,
    pub backend_name: Option<String>,
    pub backend_service: Option<String>,
    pub backend_method: Option<String>,
    pub timeout_ms: Option<i32>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
}

/// Fully-merged mutable field set for a backend. `name` and `id` are absent
/// so the store cannot alter them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUpdate {
    pub addr: String,
    pub description: Option<String>,
    pub enabled: bool,
}

impl BackendUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_field("addr", &self.addr)
    }
}

/// Fully-merged mutable field set for a route. `id` is absent so the store
/// cannot alter it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteUpdate {
    pub http_method: String,
    pub http_pattern: String,
    pub backend_name: String,
    pub backend_service: String,
    pub backend_method: String,
    pub timeout_ms: i32,
    pub description: Option<String>,
    pub enabled: bool,
}

impl RouteUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_field("http_method", &self.http_method)?;
        require_field("http_pattern", &self.http_pattern)?;
        require_field("backend_name", &self.backend_name)?;
        require_field("backend_service", &self.backend_service)?;
        require_field("backend_method", &self.backend_method)?;
        Ok(())
    }
}

/// Payload for appending one audit row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConfigHistory {
    pub config_type: ConfigType,
    pub config_id: Option<i32>,
    pub operation: ChangeOperation,
    pub old_value: Option<serde_json::Value>,
    pub new_value: Option<serde_json::Value>,
    pub operator: Option<String>,
}

/// Filter + pagination parameters for a history query. Filters combine with
/// logical AND; an absent filter matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub config_type: Option<ConfigType>,
    pub config_id: Option<i32>,
    pub limit: u64,
    pub offset: u64,
}

impl HistoryQuery {
    /// Builds a query from raw request parameters, applying the pagination
    /// fallbacks of [`page_limit`] and [`page_offset`].
    pub fn new(
        config_type: Option<ConfigType>,
        config_id: Option<i32>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Self {
        Self {
            config_type,
            config_id,
            limit: page_limit(limit),
            offset: page_offset(offset),
        }
    }
}

/// One page of history rows plus the total size of the filtered set,
/// independent of the page bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    pub items: Vec<ConfigHistory>,
    pub total: u64,
}

/// Errors emitted when a required entity field is empty or missing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field `{0}` is required and must be non-empty")]
    MissingField(&'static str),
}

/// Normalizes a timeout so persisted routes always carry a positive value.
pub fn effective_timeout_ms(requested: i32) -> i32 {
    if requested <= 0 {
        DEFAULT_TIMEOUT_MS
    } else {
        requested
    }
}

/// Resolves a requested page size. Values outside `1..=MAX_PAGE_LIMIT` fall
/// back to the default rather than clamping.
pub fn page_limit(requested: Option<i64>) -> u64 {
    match requested {
        Some(limit) if (1..=MAX_PAGE_LIMIT as i64).contains(&limit) => limit as u64,
        _ => DEFAULT_PAGE_LIMIT,
    }
}

/// Resolves a requested offset. Negative or missing values fall back to zero.
pub fn page_offset(requested: Option<i64>) -> u64 {
    match requested {
        Some(offset) if offset >= 0 => offset as u64,
        _ => 0,
    }
}

fn default_enabled() -> bool {
    true
}

fn require_field(name: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_backend_enabled_defaults_true() {
        let parsed: NewBackend =
            serde_json::from_str(r#"{"name":"account","addr":"127.0.0.1:50051"}"#).unwrap();
        assert!(parsed.enabled);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn new_backend_honors_explicit_enabled_false() {
        let parsed: NewBackend =
            serde_json::from_str(r#"{"name":"account","addr":"127.0.0.1:50051","enabled":false}"#)
                .unwrap();
        assert!(!parsed.enabled);
    }

    #[test]
    fn new_backend_validation_rejects_blank_fields() {
        let parsed: NewBackend = serde_json::from_str(r#"{"name":"  ","addr":"x"}"#).unwrap();
        assert_eq!(
            parsed.validate(),
            Err(ValidationError::MissingField("name"))
        );

        let parsed: NewBackend = serde_json::from_str(r#"{"name":"account"}"#).unwrap();
        assert_eq!(parsed.validate(), Err(ValidationError::MissingField("addr")));
    }

    #[test]
    fn new_route_validation_reports_each_required_field() {
        let mut route = NewRoute {
            http_method: "POST".into(),
            http_pattern: "/v1/user/login".into(),
            backend_name: "account".into(),
            backend_service: "user.v1.UserService".into(),
            backend_method: "Login".into(),
            timeout_ms: 0,
            description: None,
            enabled: true,
        };
        assert!(route.validate().is_ok());

        route.backend_service.clear();
        assert_eq!(
            route.validate(),
            Err(ValidationError::MissingField("backend_service"))
        );
    }

    #[test]
    fn patch_distinguishes_omitted_from_false() {
        let omitted: BackendPatch = serde_json::from_str(r#"{"addr":"127.0.0.1:9999"}"#).unwrap();
        assert_eq!(omitted.enabled, None);

        let explicit: BackendPatch =
            serde_json::from_str(r#"{"addr":"127.0.0.1:9999","enabled":false}"#).unwrap();
        assert_eq!(explicit.enabled, Some(false));
    }

    #[test]
    fn timeout_normalization_applies_default() {
        assert_eq!(effective_timeout_ms(0), DEFAULT_TIMEOUT_MS);
        assert_eq!(effective_timeout_ms(-20), DEFAULT_TIMEOUT_MS);
        assert_eq!(effective_timeout_ms(1), 1);
        assert_eq!(effective_timeout_ms(30_000), 30_000);
    }

    #[test]
    fn page_limit_falls_back_outside_bounds() {
        assert_eq!(page_limit(None), DEFAULT_PAGE_LIMIT);
        assert_eq!(page_limit(Some(0)), DEFAULT_PAGE_LIMIT);
        assert_eq!(page_limit(Some(-3)), DEFAULT_PAGE_LIMIT);
        assert_eq!(page_limit(Some(101)), DEFAULT_PAGE_LIMIT);
        assert_eq!(page_limit(Some(1)), 1);
        assert_eq!(page_limit(Some(100)), 100);
    }

    #[test]
    fn page_offset_rejects_negative_values() {
        assert_eq!(page_offset(None), 0);
        assert_eq!(page_offset(Some(-1)), 0);
        assert_eq!(page_offset(Some(25)), 25);
    }

    #[test]
    fn config_type_string_forms_round_trip() {
        assert_eq!(ConfigType::Backend.as_ref(), "backend");
        assert_eq!("route".parse::<ConfigType>(), Ok(ConfigType::Route));
        assert_eq!(
            serde_json::to_string(&ConfigType::Backend).unwrap(),
            r#""backend""#
        );
    }

    #[test]
    fn change_operation_string_forms_round_trip() {
        assert_eq!(ChangeOperation::Create.as_ref(), "CREATE");
        assert_eq!(
            "DELETE".parse::<ChangeOperation>(),
            Ok(ChangeOperation::Delete)
        );
        assert_eq!(
            serde_json::to_string(&ChangeOperation::Update).unwrap(),
            r#""UPDATE""#
        );
    }

    #[test]
    fn optional_entity_fields_are_omitted_when_absent() {
        let backend = Backend {
            id: 1,
            name: "account".into(),
            addr: "127.0.0.1:50051".into(),
            description: None,
            enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&backend).unwrap();
        assert!(!json.contains("description"));
    }
}
