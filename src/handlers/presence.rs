use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Duration;
use tracing::error;

use crate::config;
use crate::handlers::registry_error;
use crate::models::{
    ErrorResponse, PresenceUpdateResponse, RemovePresenceResponse, SessionEvent,
    SessionPresenceResponse, SweepRequest, SweepResponse, SweepResult, UpsertPresenceRequest,
};
use crate::state::AppState;

/// Upsert the presence of a user in a session
pub async fn upsert_presence(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, user_id)): Path<(String, String)>,
    Json(payload): Json<UpsertPresenceRequest>,
) -> Result<(StatusCode, Json<PresenceUpdateResponse>), (StatusCode, Json<ErrorResponse>)> {
    let entry = app_state
        .presence
        .upsert(&session_id, &user_id, payload.cursor)
        .await
        .map_err(registry_error)?;

    if let Err(e) = app_state
        .audit
        .append(Some(&session_id), &user_id, "presence.upsert", None)
        .await
    {
        error!("Audit append failed: {}", e);
    }
    app_state
        .dispatcher
        .broadcast(
            &session_id,
            SessionEvent::new(
                &session_id,
                "presenceUpdated",
                format!("{} updated their presence", user_id),
                false,
            ),
        )
        .await;

    Ok((
        StatusCode::OK,
        Json(PresenceUpdateResponse {
            success: true,
            message: "Presence updated".to_string(),
            data: entry,
        }),
    ))
}

/// Snapshot of all presence entries in a session
pub async fn get_session_presence(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<(StatusCode, Json<SessionPresenceResponse>), (StatusCode, Json<ErrorResponse>)> {
    let entries = app_state
        .presence
        .session_presence(&session_id)
        .await
        .map_err(registry_error)?;

    Ok((
        StatusCode::OK,
        Json(SessionPresenceResponse {
            success: true,
            data: entries,
        }),
    ))
}

/// Remove one user's presence from a session
pub async fn remove_presence(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, user_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<RemovePresenceResponse>), (StatusCode, Json<ErrorResponse>)> {
    let removed = app_state
        .presence
        .remove_user(&session_id, &user_id)
        .await
        .map_err(registry_error)?;

    if removed {
        if let Err(e) = app_state
            .audit
            .append(Some(&session_id), &user_id, "presence.remove", None)
            .await
        {
            error!("Audit append failed: {}", e);
        }
        app_state
            .dispatcher
            .broadcast(
                &session_id,
                SessionEvent::new(
                    &session_id,
                    "userLeft",
                    format!("{} left the session", user_id),
                    false,
                ),
            )
            .await;
    }

    Ok((
        StatusCode::OK,
        Json(RemovePresenceResponse {
            success: true,
            message: if removed {
                "Presence removed".to_string()
            } else {
                "No presence entry to remove".to_string()
            },
            data: removed,
        }),
    ))
}

/// Sweep inactive presence entries across all sessions.
/// Only runs when called; there is no internal schedule.
pub async fn sweep_presence(
    State(app_state): State<Arc<AppState>>,
    payload: Option<Json<SweepRequest>>,
) -> (StatusCode, Json<SweepResponse>) {
    let threshold_secs = payload
        .and_then(|Json(req)| req.threshold_secs)
        .unwrap_or_else(|| config::get_config().presence_idle_secs);

    let removed = app_state
        .presence
        .sweep_inactive(Duration::seconds(threshold_secs as i64))
        .await;

    if let Err(e) = app_state
        .audit
        .append(
            None,
            "system",
            "presence.sweep",
            Some(format!(
                "removed {} entries older than {}s",
                removed.len(),
                threshold_secs
            )),
        )
        .await
    {
        error!("Audit append failed: {}", e);
    }

    // Announce the sweep to every session it touched
    let mut swept_sessions: Vec<String> = removed.iter().map(|e| e.session_id.clone()).collect();
    swept_sessions.sort();
    swept_sessions.dedup();
    for session_id in &swept_sessions {
        app_state
            .dispatcher
            .broadcast(
                session_id,
                SessionEvent::new(
                    session_id,
                    "presenceSwept",
                    "Inactive users were removed".to_string(),
                    false,
                ),
            )
            .await;
    }

    let active_sessions = app_state.presence.active_session_count().await;
    (
        StatusCode::OK,
        Json(SweepResponse {
            success: true,
            message: format!("Swept {} inactive entries", removed.len()),
            data: SweepResult {
                removed,
                active_sessions,
            },
        }),
    )
}
