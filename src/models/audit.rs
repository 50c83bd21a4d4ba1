use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One audit record. Immutable once appended; there is no rollback.
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct AuditEntry {
    pub id: Uuid,
    /// Session the record belongs to; None for service-level events
    pub session_id: Option<String>,
    pub actor: String,
    pub action: String,
    pub detail: Option<String>,
    pub at: DateTime<Utc>,
}

/// Audit trail snapshot
#[derive(Serialize, Deserialize, ToSchema)]
pub struct AuditResponse {
    pub success: bool,
    pub data: Vec<AuditEntry>,
}
