use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::error;

use crate::handlers::registry_error;
use crate::models::{
    ErrorResponse, LockQueryResponse, LockRequest, LockResponse, SessionEvent,
};
use crate::state::AppState;

/// Acquire an exclusive lock on a file.
/// Fails with 409 when the file is already locked; the original lock
/// is left untouched.
pub async fn acquire_lock(
    State(app_state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
    Json(payload): Json<LockRequest>,
) -> Result<(StatusCode, Json<LockResponse>), (StatusCode, Json<ErrorResponse>)> {
    let lock = app_state
        .locks
        .acquire(&file_id, &payload.user_id, &payload.session_id)
        .await
        .map_err(registry_error)?;

    if let Err(e) = app_state
        .audit
        .append(
            Some(&payload.session_id),
            &payload.user_id,
            "lock.acquire",
            Some(format!("file {}", file_id)),
        )
        .await
    {
        error!("Audit append failed: {}", e);
    }
    app_state
        .dispatcher
        .broadcast(
            &payload.session_id,
            SessionEvent::new(
                &payload.session_id,
                "fileLocked",
                format!("{} locked file {}", payload.user_id, file_id),
                false,
            ),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(LockResponse {
            success: true,
            message: format!("File '{}' locked", file_id),
            data: lock,
        }),
    ))
}

/// Release the lock on a file.
/// Fails with 404 when the file is not locked.
pub async fn release_lock(
    State(app_state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<(StatusCode, Json<LockResponse>), (StatusCode, Json<ErrorResponse>)> {
    let lock = app_state
        .locks
        .release(&file_id)
        .await
        .map_err(registry_error)?;

    if let Err(e) = app_state
        .audit
        .append(
            Some(&lock.session_id),
            &lock.locked_by,
            "lock.release",
            Some(format!("file {}", file_id)),
        )
        .await
    {
        error!("Audit append failed: {}", e);
    }
    app_state
        .dispatcher
        .broadcast(
            &lock.session_id,
            SessionEvent::new(
                &lock.session_id,
                "fileUnlocked",
                format!("File {} was unlocked", file_id),
                false,
            ),
        )
        .await;

    Ok((
        StatusCode::OK,
        Json(LockResponse {
            success: true,
            message: format!("File '{}' unlocked", file_id),
            data: lock,
        }),
    ))
}

/// Current lock on a file, if any
pub async fn query_lock(
    State(app_state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<(StatusCode, Json<LockQueryResponse>), (StatusCode, Json<ErrorResponse>)> {
    let lock = app_state
        .locks
        .query(&file_id)
        .await
        .map_err(registry_error)?;

    Ok((
        StatusCode::OK,
        Json(LockQueryResponse {
            success: true,
            data: lock,
        }),
    ))
}
