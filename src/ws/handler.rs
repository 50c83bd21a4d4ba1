use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::Response,
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::{
    CursorPosition, PongMessage, PresenceMessage, ReceivedMessage, SendMessage, SessionEvent,
};
use crate::state::AppState;
use crate::ws::connctx::{get_conn_ctx_cache, ConnCtx};

#[derive(Deserialize)]
pub struct WsQuery {
    pub user_id: String,
}

/// WebSocket handler
pub async fn websocket_handler(
    Path(session_id): Path<String>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
    app_state: State<Arc<AppState>>,
) -> Response {
    info!("New WebSocket connection attempt for session {}", session_id);
    ws.on_upgrade(move |socket| handle_socket(socket, session_id, query.user_id, app_state.0))
}

/// Handle WebSocket connection
async fn handle_socket(
    socket: WebSocket,
    session_id: String,
    user_id: String,
    app_state: Arc<AppState>,
) {
    // Generate unique connection ID to identify this client
    let connection_id = Uuid::new_v4().to_string();
    info!(
        "WebSocket connection established for session {} user {} with connection_id {}",
        session_id, user_id, connection_id
    );

    // Register who is behind this connection
    get_conn_ctx_cache().insert(
        connection_id.clone(),
        ConnCtx {
            session_id: session_id.clone(),
            user_id: user_id.clone(),
        },
    );

    // Join presence with an empty cursor
    if let Err(e) = app_state
        .presence
        .upsert(
            &session_id,
            &user_id,
            CursorPosition {
                file_id: None,
                line: 0,
                column: 0,
            },
        )
        .await
    {
        error!("Rejecting connection {}: {}", connection_id, e);
        get_conn_ctx_cache().invalidate(&connection_id);
        return;
    }

    // Subscribe to session events before announcing the join, so this
    // connection also sees its own join event
    let mut rbc = app_state.dispatcher.subscribe(&session_id).await;
    app_state
        .dispatcher
        .broadcast(
            &session_id,
            SessionEvent::new(
                &session_id,
                "userJoined",
                format!("{} joined the session", user_id),
                false,
            ),
        )
        .await;

    // Split the socket into sender and receiver
    let (sender, mut receiver) = socket.split();

    // As we will need a reference to sender in multiple tasks, wrap it in an Arc and Mutex
    let sender1 = Arc::new(tokio::sync::Mutex::new(sender));
    let sender2 = sender1.clone();

    let recv_session = session_id.clone();
    let recv_user = user_id.clone();
    let recv_state = app_state.clone();

    // Start an async task to listen to the websocket for incoming messages
    let mut send_task = tokio::spawn(async move {
        while let Some(Ok(Message::Text(msg))) = receiver.next().await {
            // Parse the incoming message as JSON
            let json_msg: ReceivedMessage = match serde_json::from_str(&msg) {
                Ok(json_msg) => json_msg,
                Err(e) => {
                    error!(
                        "Failed to parse message for session {}: {}",
                        recv_session, e
                    );
                    continue;
                }
            };

            // Handle different message types
            match json_msg {
                ReceivedMessage::Cursor(cursor_msg) => {
                    if let Err(e) = recv_state
                        .presence
                        .upsert(&recv_session, &recv_user, cursor_msg.cursor)
                        .await
                    {
                        error!("Presence upsert failed for {}: {}", recv_user, e);
                        continue;
                    }

                    // Echo the current session presence back to this client
                    match recv_state.presence.session_presence(&recv_session).await {
                        Ok(entries) => {
                            send_to_client(
                                &sender1,
                                &SendMessage::Presence(PresenceMessage { entries }),
                            )
                            .await;
                        }
                        Err(e) => error!("Presence snapshot failed: {}", e),
                    }

                    // Announce the move to the rest of the session
                    recv_state
                        .dispatcher
                        .broadcast(
                            &recv_session,
                            SessionEvent::new(
                                &recv_session,
                                "presenceUpdated",
                                format!("{} moved their cursor", recv_user),
                                false,
                            ),
                        )
                        .await;
                }
                ReceivedMessage::Ping(_) => {
                    send_to_client(
                        &sender1,
                        &SendMessage::Pong(PongMessage {
                            date: Utc::now().to_rfc3339(),
                        }),
                    )
                    .await;
                }
                ReceivedMessage::Ack(ack_msg) => {
                    // Acknowledgments are recorded in the log only;
                    // nothing ever waits on them
                    info!(
                        "Ack received from {} for event {}",
                        recv_user, ack_msg.event_id
                    );
                }
            }
        }
    });

    // Start a task to forward session events to this client
    let filter_user = user_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Ok(targeted) = rbc.recv().await {
            // Drop events not aimed at this user
            if !targeted.target.matches(&filter_user) {
                continue;
            }

            let payload = match serde_json::to_string(&SendMessage::Event(targeted.event)) {
                Ok(payload) => payload,
                Err(e) => {
                    error!("Failed to serialize event: {}", e);
                    continue;
                }
            };

            if sender2
                .lock()
                .await
                .send(Message::Text(payload))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // The presence entry stays behind for the inactivity sweep;
    // only the connection context goes away now
    get_conn_ctx_cache().invalidate(&connection_id);
    app_state
        .dispatcher
        .broadcast(
            &session_id,
            SessionEvent::new(
                &session_id,
                "userDisconnected",
                format!("{} disconnected", user_id),
                false,
            ),
        )
        .await;
    info!("WebSocket connection {} terminated", connection_id);
}

/// Serialize and push one message to this connection's client
async fn send_to_client(
    sender: &Arc<tokio::sync::Mutex<futures_util::stream::SplitSink<WebSocket, Message>>>,
    msg: &SendMessage,
) {
    let payload = match serde_json::to_string(msg) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Failed to serialize message: {}", e);
            return;
        }
    };
    if sender
        .lock()
        .await
        .send(Message::Text(payload))
        .await
        .is_err()
    {
        warn!("Failed to send message to client");
    }
}
