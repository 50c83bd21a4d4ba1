pub mod audit;
pub mod history;
pub mod locks;
pub mod permissions;
pub mod presence;

pub use audit::AuditLogRegistry;
pub use history::HistoryRegistry;
pub use locks::FileLockRegistry;
pub use permissions::{PermissionRegistry, RoleRegistry};
pub use presence::PresenceRegistry;

use crate::models::RegistryError;

/// Reject empty or whitespace-only identifiers before touching any map
pub(crate) fn require_id(value: &str, name: &'static str) -> Result<(), RegistryError> {
    if value.trim().is_empty() {
        Err(RegistryError::MissingIdentifier(name))
    } else {
        Ok(())
    }
}
