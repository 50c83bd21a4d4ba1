use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{RegistryError, RoleEntry};
use crate::registries::require_id;

/// Per-(session, user) single role, last write wins.
///
/// This registry and [`PermissionRegistry`] are deliberately independent
/// models over the same key space, with no reconciliation between them;
/// a caller must know which one governs a given check.
#[derive(Default)]
pub struct RoleRegistry {
    roles: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a role, replacing any previous one
    pub async fn assign(
        &self,
        session_id: &str,
        user_id: &str,
        role: &str,
    ) -> Result<RoleEntry, RegistryError> {
        require_id(session_id, "session_id")?;
        require_id(user_id, "user_id")?;
        require_id(role, "role")?;

        let mut roles = self.roles.write().await;
        roles
            .entry(session_id.to_string())
            .or_default()
            .insert(user_id.to_string(), role.to_string());
        debug!(
            "Role '{}' assigned to '{}' in session '{}'",
            role, user_id, session_id
        );

        Ok(RoleEntry {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            role: role.to_string(),
        })
    }

    /// Drop the role of a user; returns whether one existed
    pub async fn remove(&self, session_id: &str, user_id: &str) -> Result<bool, RegistryError> {
        require_id(session_id, "session_id")?;
        require_id(user_id, "user_id")?;

        let mut roles = self.roles.write().await;
        let removed = match roles.get_mut(session_id) {
            Some(users) => users.remove(user_id).is_some(),
            None => false,
        };
        if removed && roles.get(session_id).is_some_and(|u| u.is_empty()) {
            roles.remove(session_id);
        }
        Ok(removed)
    }

    /// Current role of a user, if any
    pub async fn query(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<RoleEntry>, RegistryError> {
        require_id(session_id, "session_id")?;
        require_id(user_id, "user_id")?;

        let roles = self.roles.read().await;
        Ok(roles
            .get(session_id)
            .and_then(|users| users.get(user_id))
            .map(|role| RoleEntry {
                session_id: session_id.to_string(),
                user_id: user_id.to_string(),
                role: role.clone(),
            }))
    }

    /// Drop every role assignment of a session. Idempotent.
    pub async fn clear_session(&self, session_id: &str) -> usize {
        let mut roles = self.roles.write().await;
        roles
            .remove(session_id)
            .map(|users| users.len())
            .unwrap_or(0)
    }

    /// Role assignments across all sessions
    pub async fn entry_count(&self) -> usize {
        self.roles
            .read()
            .await
            .values()
            .map(|users| users.len())
            .sum()
    }
}

/// Per-(session, user) set of permission strings.
#[derive(Default)]
pub struct PermissionRegistry {
    permissions: RwLock<HashMap<String, HashMap<String, HashSet<String>>>>,
}

impl PermissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a permission; returns false when it was already present
    pub async fn grant(
        &self,
        session_id: &str,
        user_id: &str,
        permission: &str,
    ) -> Result<bool, RegistryError> {
        require_id(session_id, "session_id")?;
        require_id(user_id, "user_id")?;
        require_id(permission, "permission")?;

        let mut permissions = self.permissions.write().await;
        let inserted = permissions
            .entry(session_id.to_string())
            .or_default()
            .entry(user_id.to_string())
            .or_default()
            .insert(permission.to_string());
        Ok(inserted)
    }

    /// Revoke a permission; returns false when it was not present.
    /// A user whose set becomes empty drops out of the registry.
    pub async fn revoke(
        &self,
        session_id: &str,
        user_id: &str,
        permission: &str,
    ) -> Result<bool, RegistryError> {
        require_id(session_id, "session_id")?;
        require_id(user_id, "user_id")?;
        require_id(permission, "permission")?;

        let mut permissions = self.permissions.write().await;
        let Some(users) = permissions.get_mut(session_id) else {
            return Ok(false);
        };
        let Some(set) = users.get_mut(user_id) else {
            return Ok(false);
        };
        let removed = set.remove(permission);
        if set.is_empty() {
            users.remove(user_id);
        }
        if users.is_empty() {
            permissions.remove(session_id);
        }
        Ok(removed)
    }

    /// Permission set of a user, sorted for stable output
    pub async fn list(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Vec<String>, RegistryError> {
        require_id(session_id, "session_id")?;
        require_id(user_id, "user_id")?;

        let permissions = self.permissions.read().await;
        let mut list: Vec<String> = permissions
            .get(session_id)
            .and_then(|users| users.get(user_id))
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        list.sort();
        Ok(list)
    }

    /// Whether a user holds a specific permission
    pub async fn has(
        &self,
        session_id: &str,
        user_id: &str,
        permission: &str,
    ) -> Result<bool, RegistryError> {
        require_id(session_id, "session_id")?;
        require_id(user_id, "user_id")?;

        let permissions = self.permissions.read().await;
        Ok(permissions
            .get(session_id)
            .and_then(|users| users.get(user_id))
            .map(|set| set.contains(permission))
            .unwrap_or(false))
    }

    /// Drop every permission set of a session. Idempotent.
    pub async fn clear_session(&self, session_id: &str) -> usize {
        let mut permissions = self.permissions.write().await;
        permissions
            .remove(session_id)
            .map(|users| users.len())
            .unwrap_or(0)
    }

    /// Users with a non-empty permission set, across all sessions
    pub async fn entry_count(&self) -> usize {
        self.permissions
            .read()
            .await
            .values()
            .map(|users| users.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn role_assignment_is_last_write_wins() {
        let registry = RoleRegistry::new();

        registry.assign("s1", "alice", "viewer").await.unwrap();
        registry.assign("s1", "alice", "editor").await.unwrap();

        let entry = registry.query("s1", "alice").await.unwrap().unwrap();
        assert_eq!(entry.role, "editor");
        assert_eq!(registry.entry_count().await, 1);
    }

    #[tokio::test]
    async fn role_remove_and_query_missing() {
        let registry = RoleRegistry::new();

        assert!(!registry.remove("s1", "alice").await.unwrap());
        registry.assign("s1", "alice", "viewer").await.unwrap();
        assert!(registry.remove("s1", "alice").await.unwrap());
        assert!(registry.query("s1", "alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn grant_is_set_semantics() {
        let registry = PermissionRegistry::new();

        assert!(registry.grant("s1", "alice", "read").await.unwrap());
        assert!(!registry.grant("s1", "alice", "read").await.unwrap());
        assert!(registry.grant("s1", "alice", "write").await.unwrap());

        let list = registry.list("s1", "alice").await.unwrap();
        assert_eq!(list, vec!["read".to_string(), "write".to_string()]);
        assert!(registry.has("s1", "alice", "write").await.unwrap());
        assert!(!registry.has("s1", "alice", "admin").await.unwrap());
    }

    #[tokio::test]
    async fn revoking_last_permission_drops_the_user() {
        let registry = PermissionRegistry::new();

        registry.grant("s1", "alice", "read").await.unwrap();
        assert!(registry.revoke("s1", "alice", "read").await.unwrap());
        assert!(!registry.revoke("s1", "alice", "read").await.unwrap());
        assert_eq!(registry.entry_count().await, 0);
    }

    #[tokio::test]
    async fn the_two_models_do_not_reconcile() {
        let roles = RoleRegistry::new();
        let permissions = PermissionRegistry::new();

        roles.assign("s1", "alice", "editor").await.unwrap();

        // Holding a role implies nothing in the permission-set model
        assert!(!permissions.has("s1", "alice", "edit").await.unwrap());
        assert!(permissions.list("s1", "alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_session_empties_both_registries() {
        let roles = RoleRegistry::new();
        let permissions = PermissionRegistry::new();

        roles.assign("s1", "alice", "editor").await.unwrap();
        roles.assign("s1", "bob", "viewer").await.unwrap();
        permissions.grant("s1", "alice", "read").await.unwrap();

        assert_eq!(roles.clear_session("s1").await, 2);
        assert_eq!(permissions.clear_session("s1").await, 1);
        assert_eq!(roles.clear_session("s1").await, 0);
        assert_eq!(permissions.clear_session("s1").await, 0);
    }
}
