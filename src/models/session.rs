use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What a session clear removed from each registry.
/// All zeroes means the clear was a no-op.
#[derive(Serialize, Deserialize, ToSchema, Debug, Default, PartialEq, Eq)]
pub struct SessionClearSummary {
    pub presence_removed: usize,
    pub locks_released: usize,
    pub roles_removed: usize,
    pub permission_sets_removed: usize,
    pub history_removed: usize,
    pub audit_removed: usize,
}

impl SessionClearSummary {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Response after clearing a session everywhere
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ClearSessionResponse {
    pub success: bool,
    pub message: String,
    pub data: SessionClearSummary,
}
