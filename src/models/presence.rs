use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Cursor location of a user inside a session
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug, PartialEq, Eq)]
pub struct CursorPosition {
    /// File the cursor is in, if any
    pub file_id: Option<String>,
    pub line: u32,
    pub column: u32,
}

/// Presence of one user in one session
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct PresenceEntry {
    pub session_id: String,
    pub user_id: String,
    pub cursor: CursorPosition,
    pub last_seen: DateTime<Utc>,
}

/// Request body for a presence upsert
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct UpsertPresenceRequest {
    pub cursor: CursorPosition,
}

/// Response after a presence upsert
#[derive(Serialize, Deserialize, ToSchema)]
pub struct PresenceUpdateResponse {
    pub success: bool,
    pub message: String,
    pub data: PresenceEntry,
}

/// Snapshot of all presence entries in a session
#[derive(Serialize, Deserialize, ToSchema)]
pub struct SessionPresenceResponse {
    pub success: bool,
    pub data: Vec<PresenceEntry>,
}

/// Request body for an inactivity sweep
#[derive(Serialize, Deserialize, ToSchema, Debug, Default)]
pub struct SweepRequest {
    /// Inactivity threshold in seconds; falls back to the configured default
    pub threshold_secs: Option<u64>,
}

/// Result of an inactivity sweep
#[derive(Serialize, Deserialize, ToSchema)]
pub struct SweepResponse {
    pub success: bool,
    pub message: String,
    pub data: SweepResult,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SweepResult {
    /// Entries removed by the sweep
    pub removed: Vec<PresenceEntry>,
    /// Sessions still holding at least one presence entry
    pub active_sessions: usize,
}

/// Response after removing a single presence entry
#[derive(Serialize, Deserialize, ToSchema)]
pub struct RemovePresenceResponse {
    pub success: bool,
    pub message: String,
    /// Whether an entry was actually removed
    pub data: bool,
}
