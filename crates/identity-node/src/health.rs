use crate::dto::{ComponentHealth, HealthResponse};
use crate::state::AppState;

/// Pings the store, the registry's active rule set, and reports overall
/// status. No status-list HTTP transport is configured in this deployment,
/// so that component is omitted rather than reported as unknown.
pub fn check(state: &AppState) -> HealthResponse {
    let mut components = Vec::new();
    let mut healthy = true;

    match state.checkpoints.get_latest() {
        Ok(_) => components.push(ComponentHealth {
            name: "store".into(),
            status: "ok".into(),
            detail: None,
        }),
        Err(identity_core::IdentityError::NotFound(_)) => components.push(ComponentHealth {
            name: "store".into(),
            status: "ok".into(),
            detail: Some("no checkpoints yet".into()),
        }),
        Err(e) => {
            healthy = false;
            components.push(ComponentHealth {
                name: "store".into(),
                status: "error".into(),
                detail: Some(e.to_string()),
            });
        }
    }

    match state.registry.get_active() {
        Ok(rule_set) => components.push(ComponentHealth {
            name: "registry".into(),
            status: "ok".into(),
            detail: Some(format!("active rule set {}", rule_set.id)),
        }),
        Err(e) => {
            healthy = false;
            components.push(ComponentHealth {
                name: "registry".into(),
                status: "error".into(),
                detail: Some(e.to_string()),
            });
        }
    }

    HealthResponse {
        status: if healthy { "ok".into() } else { "degraded".into() },
        components,
    }
}
