use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Single role of a user in a session, last write wins
#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
pub struct RoleEntry {
    pub session_id: String,
    pub user_id: String,
    pub role: String,
}

/// Request body for a role assignment
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct AssignRoleRequest {
    pub role: String,
}

/// Response carrying the role of a user, if any
#[derive(Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    pub success: bool,
    pub data: Option<RoleEntry>,
}

/// Request body for a permission grant or revoke
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct PermissionRequest {
    pub permission: String,
}

/// Response carrying the permission set of a user, sorted for stable output
#[derive(Serialize, Deserialize, ToSchema)]
pub struct PermissionSetResponse {
    pub success: bool,
    pub data: Vec<String>,
}

/// Response after a grant/revoke/remove operation
#[derive(Serialize, Deserialize, ToSchema)]
pub struct PermissionChangeResponse {
    pub success: bool,
    pub message: String,
    /// Whether the operation changed anything
    pub data: bool,
}
