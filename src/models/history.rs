use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One change recorded in a session history.
/// Histories are append-only; rollback truncates and the discarded
/// tail is gone for good. Rollback never touches file content.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub user_id: String,
    pub action: String,
    pub detail: Option<String>,
    pub at: DateTime<Utc>,
}

/// Request body for a history append
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct AppendHistoryRequest {
    pub user_id: String,
    pub action: String,
    pub detail: Option<String>,
}

/// Response after a history append
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HistoryAppendResponse {
    pub success: bool,
    pub message: String,
    pub data: HistoryEntry,
}

/// Full history of a session
#[derive(Serialize, Deserialize, ToSchema)]
pub struct SessionHistoryResponse {
    pub success: bool,
    pub data: Vec<HistoryEntry>,
}

/// Request body for a rollback
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct RollbackRequest {
    /// Index of the last entry to keep
    pub index: usize,
}

/// Response after a rollback
#[derive(Serialize, Deserialize, ToSchema)]
pub struct RollbackResponse {
    pub success: bool,
    pub message: String,
    pub data: RollbackOutcome,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RollbackOutcome {
    /// Entries remaining after truncation
    pub kept: usize,
    /// Entries discarded by the rollback, in original order
    pub discarded: Vec<HistoryEntry>,
}
