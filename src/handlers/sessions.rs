use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

use crate::handlers::registry_error;
use crate::models::{ClearSessionResponse, ErrorResponse, SessionEvent};
use crate::registries::require_id;
use crate::state::AppState;

/// Clear a session from every registry: presence, locks, roles,
/// permissions, history and audit. Idempotent.
pub async fn clear_session(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<(StatusCode, Json<ClearSessionResponse>), (StatusCode, Json<ErrorResponse>)> {
    require_id(&session_id, "session_id").map_err(registry_error)?;

    // Announce before tearing the channel down so connected clients
    // still hear it
    app_state
        .dispatcher
        .broadcast(
            &session_id,
            SessionEvent::new(
                &session_id,
                "sessionCleared",
                "Session is being cleared".to_string(),
                false,
            ),
        )
        .await;

    let summary = app_state.clear_session(&session_id).await;
    app_state.dispatcher.drop_session(&session_id).await;

    // Service-level record so the clear itself survives the wipe
    if let Err(e) = app_state
        .audit
        .append(
            None,
            "system",
            "session.clear",
            Some(format!("session {}: {:?}", session_id, summary)),
        )
        .await
    {
        error!("Audit append failed: {}", e);
    }

    let message = if summary.is_noop() {
        info!("Clear of session '{}' was a no-op", session_id);
        "Session had no entries".to_string()
    } else {
        info!("Session '{}' cleared: {:?}", session_id, summary);
        "Session cleared".to_string()
    };

    Ok((
        StatusCode::OK,
        Json(ClearSessionResponse {
            success: true,
            message,
            data: summary,
        }),
    ))
}
