use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Delivery scope of a notification within a session
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "target", rename_all = "lowercase")]
pub enum NotificationTarget {
    /// A single user
    User { user_id: String },
    /// A specific set of users
    Users { user_ids: Vec<String> },
    /// Every connected user of the session
    Broadcast,
}

impl NotificationTarget {
    /// Whether an event with this target should reach the given user
    pub fn matches(&self, user_id: &str) -> bool {
        match self {
            NotificationTarget::User { user_id: target } => target == user_id,
            NotificationTarget::Users { user_ids } => user_ids.iter().any(|u| u == user_id),
            NotificationTarget::Broadcast => true,
        }
    }
}

/// An event announced to the users of a session.
///
/// Delivery is fire and forget. `request_ack` asks the client to
/// acknowledge, but nothing ever awaits the response.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionEvent {
    pub id: Uuid,
    pub session_id: String,
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub request_ack: bool,
    pub at: DateTime<Utc>,
}

impl SessionEvent {
    pub fn new(session_id: &str, kind: &str, message: String, request_ack: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            kind: kind.to_string(),
            message,
            request_ack,
            at: Utc::now(),
        }
    }
}

/// Event paired with its delivery scope, as carried on the
/// per-session broadcast channel
#[derive(Clone, Debug)]
pub struct TargetedEvent {
    pub target: NotificationTarget,
    pub event: SessionEvent,
}

/// Request body for sending a notification
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct NotifyRequest {
    pub session_id: String,
    #[serde(flatten)]
    pub target: NotificationTarget,
    pub message: String,
    #[serde(default)]
    pub request_ack: bool,
}

/// Response after dispatching a notification
#[derive(Serialize, Deserialize, ToSchema)]
pub struct NotifyResponse {
    pub success: bool,
    pub message: String,
    /// Number of live subscribers on the session channel at send time
    pub data: usize,
}
