use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::handlers::registry_error;
use crate::models::{AuditResponse, ErrorResponse};
use crate::state::AppState;

/// Full audit trail, oldest first
pub async fn get_audit(State(app_state): State<Arc<AppState>>) -> (StatusCode, Json<AuditResponse>) {
    let entries = app_state.audit.all().await;
    (
        StatusCode::OK,
        Json(AuditResponse {
            success: true,
            data: entries,
        }),
    )
}

/// Audit trail of one session
pub async fn get_session_audit(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<(StatusCode, Json<AuditResponse>), (StatusCode, Json<ErrorResponse>)> {
    let entries = app_state
        .audit
        .by_session(&session_id)
        .await
        .map_err(registry_error)?;

    Ok((
        StatusCode::OK,
        Json(AuditResponse {
            success: true,
            data: entries,
        }),
    ))
}
