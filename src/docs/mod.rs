use utoipa::OpenApi;

use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Service diagnostics
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics",
    responses(
        (status = 200, description = "Aggregated registry and system stats", body = DiagnosticsResponse)
    )
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

/// Upsert the presence of a user in a session
#[utoipa::path(
    put,
    path = "/api/v1/sessions/{session_id}/presence/{user_id}",
    request_body = UpsertPresenceRequest,
    responses(
        (status = 200, description = "Presence updated", body = PresenceUpdateResponse),
        (status = 400, description = "Missing identifier", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn upsert_presence_doc() {}

/// Presence snapshot of a session
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{session_id}/presence",
    responses(
        (status = 200, description = "Presence entries", body = SessionPresenceResponse)
    )
)]
#[allow(dead_code)]
pub async fn get_session_presence_doc() {}

/// Sweep inactive presence entries
#[utoipa::path(
    post,
    path = "/api/v1/presence/sweep",
    request_body = SweepRequest,
    responses(
        (status = 200, description = "Sweep result", body = SweepResponse)
    )
)]
#[allow(dead_code)]
pub async fn sweep_presence_doc() {}

/// Acquire an exclusive file lock
#[utoipa::path(
    post,
    path = "/api/v1/files/{file_id}/lock",
    request_body = LockRequest,
    responses(
        (status = 201, description = "Lock acquired", body = LockResponse),
        (status = 409, description = "File already locked", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn acquire_lock_doc() {}

/// Release a file lock
#[utoipa::path(
    delete,
    path = "/api/v1/files/{file_id}/lock",
    responses(
        (status = 200, description = "Lock released", body = LockResponse),
        (status = 404, description = "File not locked", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn release_lock_doc() {}

/// Assign a role to a user
#[utoipa::path(
    put,
    path = "/api/v1/sessions/{session_id}/roles/{user_id}",
    request_body = AssignRoleRequest,
    responses(
        (status = 200, description = "Role assigned", body = RoleResponse)
    )
)]
#[allow(dead_code)]
pub async fn assign_role_doc() {}

/// Grant a permission to a user
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/permissions/{user_id}",
    request_body = PermissionRequest,
    responses(
        (status = 200, description = "Grant outcome", body = PermissionChangeResponse)
    )
)]
#[allow(dead_code)]
pub async fn grant_permission_doc() {}

/// Append a history entry
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/history",
    request_body = AppendHistoryRequest,
    responses(
        (status = 201, description = "Change recorded", body = HistoryAppendResponse)
    )
)]
#[allow(dead_code)]
pub async fn append_history_doc() {}

/// Roll a session history back by truncation
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/history/rollback",
    request_body = RollbackRequest,
    responses(
        (status = 200, description = "Rollback outcome", body = RollbackResponse),
        (status = 400, description = "Index out of range", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn rollback_history_doc() {}

/// Full audit trail
#[utoipa::path(
    get,
    path = "/api/v1/audit",
    responses(
        (status = 200, description = "Audit entries", body = AuditResponse)
    )
)]
#[allow(dead_code)]
pub async fn get_audit_doc() {}

/// Dispatch a notification to users of a session
#[utoipa::path(
    post,
    path = "/api/v1/notifications",
    request_body = NotifyRequest,
    responses(
        (status = 200, description = "Notification dispatched", body = NotifyResponse)
    )
)]
#[allow(dead_code)]
pub async fn send_notification_doc() {}

/// Clear a session from every registry
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{session_id}",
    responses(
        (status = 200, description = "Clear summary", body = ClearSessionResponse)
    )
)]
#[allow(dead_code)]
pub async fn clear_session_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        diagnostics_doc,
        upsert_presence_doc,
        get_session_presence_doc,
        sweep_presence_doc,
        acquire_lock_doc,
        release_lock_doc,
        assign_role_doc,
        grant_permission_doc,
        append_history_doc,
        rollback_history_doc,
        get_audit_doc,
        send_notification_doc,
        clear_session_doc,
    ),
    components(
        schemas(
            HealthResponse,
            DiagnosticsResponse,
            ErrorResponse,
            CursorPosition,
            PresenceEntry,
            UpsertPresenceRequest,
            PresenceUpdateResponse,
            SessionPresenceResponse,
            RemovePresenceResponse,
            SweepRequest,
            SweepResponse,
            SweepResult,
            FileLock,
            LockRequest,
            LockResponse,
            LockQueryResponse,
            RoleEntry,
            AssignRoleRequest,
            RoleResponse,
            PermissionRequest,
            PermissionSetResponse,
            PermissionChangeResponse,
            HistoryEntry,
            AppendHistoryRequest,
            HistoryAppendResponse,
            SessionHistoryResponse,
            RollbackRequest,
            RollbackResponse,
            RollbackOutcome,
            AuditEntry,
            AuditResponse,
            NotificationTarget,
            SessionEvent,
            NotifyRequest,
            NotifyResponse,
            SessionClearSummary,
            ClearSessionResponse,
        )
    ),
    tags(
        (name = "api", description = "Collaboration coordination endpoints")
    )
)]
pub struct ApiDoc;
