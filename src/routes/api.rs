use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{
    audit, diagnostics, health, history, locks, notifications, permissions, presence, sessions,
};
use crate::state::AppState;

/// Create API routes
pub fn create_api_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health::health_check))
        .route("/v1/ready", get(health::ready_check))
        .route("/v1/diagnostics", get(diagnostics::diagnostics))
        .route(
            "/v1/sessions/:session_id/presence",
            get(presence::get_session_presence),
        )
        .route(
            "/v1/sessions/:session_id/presence/:user_id",
            put(presence::upsert_presence).delete(presence::remove_presence),
        )
        .route("/v1/presence/sweep", post(presence::sweep_presence))
        .route(
            "/v1/files/:file_id/lock",
            post(locks::acquire_lock)
                .get(locks::query_lock)
                .delete(locks::release_lock),
        )
        .route(
            "/v1/sessions/:session_id/roles/:user_id",
            put(permissions::assign_role)
                .get(permissions::get_role)
                .delete(permissions::remove_role),
        )
        .route(
            "/v1/sessions/:session_id/permissions/:user_id",
            post(permissions::grant_permission)
                .get(permissions::list_permissions)
                .delete(permissions::revoke_permission),
        )
        .route(
            "/v1/sessions/:session_id/history",
            post(history::append_history).get(history::get_session_history),
        )
        .route(
            "/v1/sessions/:session_id/history/rollback",
            post(history::rollback_history),
        )
        .route("/v1/audit", get(audit::get_audit))
        .route(
            "/v1/sessions/:session_id/audit",
            get(audit::get_session_audit),
        )
        .route("/v1/notifications", post(notifications::send_notification))
        .route("/v1/sessions/:session_id", delete(sessions::clear_session))
        .with_state(app_state)
}
