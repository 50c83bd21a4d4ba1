use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Aggregated service diagnostics
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DiagnosticsResponse {
    /// Sessions with at least one presence entry
    pub n_sessions: u32,
    /// Presence entries across all sessions
    pub n_presence: u32,
    /// Files currently locked
    pub n_locks: u32,
    /// Role assignments across all sessions
    pub n_roles: u32,
    /// Users with a non-empty permission set
    pub n_permission_sets: u32,
    /// History entries across all sessions
    pub n_history: u32,
    /// Audit entries
    pub n_audit: u32,
    /// Live WebSocket connections
    pub n_conn: u32,
    pub cpu_usage: f32,
    pub memory_alloc: u64,
    pub memory_total: u64,
    pub memory_free: u64,
}
