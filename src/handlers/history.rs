use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::error;

use crate::handlers::registry_error;
use crate::models::{
    AppendHistoryRequest, ErrorResponse, HistoryAppendResponse, RollbackOutcome, RollbackRequest,
    RollbackResponse, SessionEvent, SessionHistoryResponse,
};
use crate::state::AppState;

/// Append a change record to a session history
pub async fn append_history(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<AppendHistoryRequest>,
) -> Result<(StatusCode, Json<HistoryAppendResponse>), (StatusCode, Json<ErrorResponse>)> {
    let entry = app_state
        .history
        .append(&session_id, &payload.user_id, &payload.action, payload.detail)
        .await
        .map_err(registry_error)?;

    if let Err(e) = app_state
        .audit
        .append(
            Some(&session_id),
            &payload.user_id,
            "history.append",
            Some(payload.action.clone()),
        )
        .await
    {
        error!("Audit append failed: {}", e);
    }

    Ok((
        StatusCode::CREATED,
        Json(HistoryAppendResponse {
            success: true,
            message: "Change recorded".to_string(),
            data: entry,
        }),
    ))
}

/// Full history of a session, oldest first
pub async fn get_session_history(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<(StatusCode, Json<SessionHistoryResponse>), (StatusCode, Json<ErrorResponse>)> {
    let entries = app_state
        .history
        .session_history(&session_id)
        .await
        .map_err(registry_error)?;

    Ok((
        StatusCode::OK,
        Json(SessionHistoryResponse {
            success: true,
            data: entries,
        }),
    ))
}

/// Roll the session history back so exactly `index + 1` entries remain.
/// The discarded tail is gone for good; file content is not touched.
pub async fn rollback_history(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<RollbackRequest>,
) -> Result<(StatusCode, Json<RollbackResponse>), (StatusCode, Json<ErrorResponse>)> {
    let discarded = app_state
        .history
        .rollback(&session_id, payload.index)
        .await
        .map_err(registry_error)?;

    let kept = app_state
        .history
        .session_history(&session_id)
        .await
        .map_err(registry_error)?
        .len();

    if let Err(e) = app_state
        .audit
        .append(
            Some(&session_id),
            "system",
            "history.rollback",
            Some(format!("to index {}, discarded {}", payload.index, discarded.len())),
        )
        .await
    {
        error!("Audit append failed: {}", e);
    }
    // Ask clients to acknowledge; nothing awaits the answer
    app_state
        .dispatcher
        .broadcast(
            &session_id,
            SessionEvent::new(
                &session_id,
                "historyRolledBack",
                format!("History rolled back to index {}", payload.index),
                true,
            ),
        )
        .await;

    Ok((
        StatusCode::OK,
        Json(RollbackResponse {
            success: true,
            message: format!("Rolled back to index {}", payload.index),
            data: RollbackOutcome { kept, discarded },
        }),
    ))
}
