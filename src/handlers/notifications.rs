use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use crate::handlers::registry_error;
use crate::models::{ErrorResponse, NotifyRequest, NotifyResponse, SessionEvent};
use crate::registries::require_id;
use crate::state::AppState;

/// Fan a notification out to one, many, or all users of a session.
/// Fire and forget: the subscriber count is reported, delivery is not.
pub async fn send_notification(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<NotifyRequest>,
) -> Result<(StatusCode, Json<NotifyResponse>), (StatusCode, Json<ErrorResponse>)> {
    require_id(&payload.session_id, "session_id").map_err(registry_error)?;

    let event = SessionEvent::new(
        &payload.session_id,
        "notification",
        payload.message.clone(),
        payload.request_ack,
    );
    let delivered = app_state
        .dispatcher
        .send(&payload.session_id, payload.target.clone(), event)
        .await;

    if let Err(e) = app_state
        .audit
        .append(
            Some(&payload.session_id),
            "system",
            "notification.send",
            Some(format!("{} subscribers", delivered)),
        )
        .await
    {
        error!("Audit append failed: {}", e);
    }

    Ok((
        StatusCode::OK,
        Json(NotifyResponse {
            success: true,
            message: "Notification dispatched".to_string(),
            data: delivered,
        }),
    ))
}
