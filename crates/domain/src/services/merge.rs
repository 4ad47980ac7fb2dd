//! Reconciles partial update payloads against stored entity state.
//!
//! A patch field carrying `Some` wins over the stored value, including
//! `Some(false)` for `enabled`; a `None` field preserves what is stored.
//! Identity fields never appear in a patch, so the merged result can only
//! carry them forward. Required-field validation runs on the merged result,
//! not the raw patch.

use crate::model::{
    effective_timeout_ms, Backend, BackendPatch, BackendUpdate, Route, RoutePatch, RouteUpdate,
};

pub fn merge_backend(existing: &Backend, patch: BackendPatch) -> BackendUpdate {
    BackendUpdate {
        addr: patch.addr.unwrap_or_else(|| existing.addr.clone()),
        description: patch.description.or_else(|| existing.description.clone()),
        enabled: patch.enabled.unwrap_or(existing.enabled),
    }
}

pub fn merge_route(existing: &Route, patch: RoutePatch) -> RouteUpdate {
    let merged_timeout = patch.timeout_ms.unwrap_or(existing.timeout_ms);
    RouteUpdate {
        http_method: patch
            .http_method
            .unwrap_or_else(|| existing.http_method.clone()),
        http_pattern: patch
            .http_pattern
            .unwrap_or_else(|| existing.http_pattern.clone()),
        backend_name: patch
            .backend_name
            .unwrap_or_else(|| existing.backend_name.clone()),
        backend_service: patch
            .backend_service
            .unwrap_or_else(|| existing.backend_service.clone()),
        backend_method: patch
            .backend_method
            .unwrap_or_else(|| existing.backend_method.clone()),
        timeout_ms: effective_timeout_ms(merged_timeout),
        description: patch.description.or_else(|| existing.description.clone()),
        enabled: patch.enabled.unwrap_or(existing.enabled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_backend() -> Backend {
        Backend {
            id: 1,
            name: "account".into(),
            addr: "127.0.0.1:50051".into(),
            description: Some("user account service".into()),
            enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_route() -> Route {
        Route {
            id: 7,
            http_method: "POST".into(),
            http_pattern: "/v1/user/login".into(),
            backend_name: "account".into(),
            backend_service: "user.v1.UserService".into(),
            backend_method: "Login".into(),
            timeout_ms: 3000,
            description: None,
            enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn omitted_enabled_preserves_stored_value() {
        let existing = sample_backend();
        let merged = merge_backend(
            &existing,
            BackendPatch {
                addr: Some("127.0.0.1:9999".into()),
                ..BackendPatch::default()
            },
        );
        assert_eq!(merged.addr, "127.0.0.1:9999");
        assert!(merged.enabled);
        assert_eq!(merged.description, existing.description);
    }

    #[test]
    fn explicit_enabled_false_wins() {
        let merged = merge_backend(
            &sample_backend(),
            BackendPatch {
                addr: Some("127.0.0.1:9999".into()),
                enabled: Some(false),
                ..BackendPatch::default()
            },
        );
        assert!(!merged.enabled);
    }

    #[test]
    fn empty_patch_keeps_every_field() {
        let existing = sample_route();
        let merged = merge_route(&existing, RoutePatch::default());
        assert_eq!(merged.http_method, existing.http_method);
        assert_eq!(merged.http_pattern, existing.http_pattern);
        assert_eq!(merged.backend_name, existing.backend_name);
        assert_eq!(merged.backend_service, existing.backend_service);
        assert_eq!(merged.backend_method, existing.backend_method);
        assert_eq!(merged.timeout_ms, existing.timeout_ms);
        assert_eq!(merged.enabled, existing.enabled);
    }

    #[test]
    fn merged_timeout_is_normalized() {
        let merged = merge_route(
            &sample_route(),
            RoutePatch {
                timeout_ms: Some(0),
                ..RoutePatch::default()
            },
        );
        assert_eq!(merged.timeout_ms, crate::model::DEFAULT_TIMEOUT_MS);

        let merged = merge_route(
            &sample_route(),
            RoutePatch {
                timeout_ms: Some(-250),
                ..RoutePatch::default()
            },
        );
        assert_eq!(merged.timeout_ms, crate::model::DEFAULT_TIMEOUT_MS);

        let merged = merge_route(
            &sample_route(),
            RoutePatch {
                timeout_ms: Some(12_000),
                ..RoutePatch::default()
            },
        );
        assert_eq!(merged.timeout_ms, 12_000);
    }

    #[test]
    fn patch_can_retarget_backend_name() {
        let existing = sample_route();
        let merged = merge_route(
            &existing,
            RoutePatch {
                backend_name: Some("billing".into()),
                ..RoutePatch::default()
            },
        );
        assert_eq!(merged.backend_name, "billing");
        assert!(merged.validate().is_ok());
    }
}
