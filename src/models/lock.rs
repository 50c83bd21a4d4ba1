use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Exclusive, non-expiring claim on a file identifier.
/// At most one lock exists per file; it persists until released.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct FileLock {
    pub file_id: String,
    pub locked_by: String,
    pub session_id: String,
    pub locked_at: DateTime<Utc>,
}

/// Request body for a lock acquisition
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct LockRequest {
    pub user_id: String,
    pub session_id: String,
}

/// Response after acquiring or releasing a lock
#[derive(Serialize, Deserialize, ToSchema)]
pub struct LockResponse {
    pub success: bool,
    pub message: String,
    pub data: FileLock,
}

/// Response for a lock query
#[derive(Serialize, Deserialize, ToSchema)]
pub struct LockQueryResponse {
    pub success: bool,
    pub data: Option<FileLock>,
}
