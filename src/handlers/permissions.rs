use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::error;

use crate::handlers::registry_error;
use crate::models::{
    AssignRoleRequest, ErrorResponse, PermissionChangeResponse, PermissionRequest,
    PermissionSetResponse, RoleResponse, SessionEvent,
};
use crate::state::AppState;

/// Assign a role to a user in a session, replacing any previous role
pub async fn assign_role(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, user_id)): Path<(String, String)>,
    Json(payload): Json<AssignRoleRequest>,
) -> Result<(StatusCode, Json<RoleResponse>), (StatusCode, Json<ErrorResponse>)> {
    let entry = app_state
        .roles
        .assign(&session_id, &user_id, &payload.role)
        .await
        .map_err(registry_error)?;

    if let Err(e) = app_state
        .audit
        .append(
            Some(&session_id),
            &user_id,
            "role.assign",
            Some(payload.role.clone()),
        )
        .await
    {
        error!("Audit append failed: {}", e);
    }
    app_state
        .dispatcher
        .notify_user(
            &session_id,
            &user_id,
            SessionEvent::new(
                &session_id,
                "roleAssigned",
                format!("You are now '{}'", payload.role),
                false,
            ),
        )
        .await;

    Ok((
        StatusCode::OK,
        Json(RoleResponse {
            success: true,
            data: Some(entry),
        }),
    ))
}

/// Current role of a user, if any
pub async fn get_role(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, user_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<RoleResponse>), (StatusCode, Json<ErrorResponse>)> {
    let entry = app_state
        .roles
        .query(&session_id, &user_id)
        .await
        .map_err(registry_error)?;

    Ok((
        StatusCode::OK,
        Json(RoleResponse {
            success: true,
            data: entry,
        }),
    ))
}

/// Drop the role of a user
pub async fn remove_role(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, user_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<PermissionChangeResponse>), (StatusCode, Json<ErrorResponse>)> {
    let removed = app_state
        .roles
        .remove(&session_id, &user_id)
        .await
        .map_err(registry_error)?;

    if removed {
        if let Err(e) = app_state
            .audit
            .append(Some(&session_id), &user_id, "role.remove", None)
            .await
        {
            error!("Audit append failed: {}", e);
        }
        app_state
            .dispatcher
            .notify_user(
                &session_id,
                &user_id,
                SessionEvent::new(
                    &session_id,
                    "roleRemoved",
                    "Your role was removed".to_string(),
                    false,
                ),
            )
            .await;
    }

    Ok((
        StatusCode::OK,
        Json(PermissionChangeResponse {
            success: true,
            message: if removed {
                "Role removed".to_string()
            } else {
                "No role to remove".to_string()
            },
            data: removed,
        }),
    ))
}

/// Grant a permission to a user in a session
pub async fn grant_permission(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, user_id)): Path<(String, String)>,
    Json(payload): Json<PermissionRequest>,
) -> Result<(StatusCode, Json<PermissionChangeResponse>), (StatusCode, Json<ErrorResponse>)> {
    let granted = app_state
        .permissions
        .grant(&session_id, &user_id, &payload.permission)
        .await
        .map_err(registry_error)?;

    if granted {
        if let Err(e) = app_state
            .audit
            .append(
                Some(&session_id),
                &user_id,
                "permission.grant",
                Some(payload.permission.clone()),
            )
            .await
        {
            error!("Audit append failed: {}", e);
        }
        app_state
            .dispatcher
            .notify_user(
                &session_id,
                &user_id,
                SessionEvent::new(
                    &session_id,
                    "permissionGranted",
                    format!("You were granted '{}'", payload.permission),
                    false,
                ),
            )
            .await;
    }

    Ok((
        StatusCode::OK,
        Json(PermissionChangeResponse {
            success: true,
            message: if granted {
                format!("Permission '{}' granted", payload.permission)
            } else {
                format!("Permission '{}' was already granted", payload.permission)
            },
            data: granted,
        }),
    ))
}

/// Revoke a permission from a user in a session
pub async fn revoke_permission(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, user_id)): Path<(String, String)>,
    Json(payload): Json<PermissionRequest>,
) -> Result<(StatusCode, Json<PermissionChangeResponse>), (StatusCode, Json<ErrorResponse>)> {
    let revoked = app_state
        .permissions
        .revoke(&session_id, &user_id, &payload.permission)
        .await
        .map_err(registry_error)?;

    if revoked {
        if let Err(e) = app_state
            .audit
            .append(
                Some(&session_id),
                &user_id,
                "permission.revoke",
                Some(payload.permission.clone()),
            )
            .await
        {
            error!("Audit append failed: {}", e);
        }
    }

    Ok((
        StatusCode::OK,
        Json(PermissionChangeResponse {
            success: true,
            message: if revoked {
                format!("Permission '{}' revoked", payload.permission)
            } else {
                format!("Permission '{}' was not granted", payload.permission)
            },
            data: revoked,
        }),
    ))
}

/// Permission set of a user, sorted
pub async fn list_permissions(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, user_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<PermissionSetResponse>), (StatusCode, Json<ErrorResponse>)> {
    let permissions = app_state
        .permissions
        .list(&session_id, &user_id)
        .await
        .map_err(registry_error)?;

    Ok((
        StatusCode::OK,
        Json(PermissionSetResponse {
            success: true,
            data: permissions,
        }),
    ))
}
