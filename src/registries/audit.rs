use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{AuditEntry, RegistryError};
use crate::registries::require_id;

/// Append-only audit trail. Entries are immutable and there is no
/// rollback; the only removal path is clearing a session.
#[derive(Default)]
pub struct AuditLogRegistry {
    entries: RwLock<Vec<AuditEntry>>,
}

impl AuditLogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an audit record, assigning its id and timestamp.
    /// `session_id = None` marks a service-level event.
    pub async fn append(
        &self,
        session_id: Option<&str>,
        actor: &str,
        action: &str,
        detail: Option<String>,
    ) -> Result<AuditEntry, RegistryError> {
        require_id(actor, "actor")?;
        require_id(action, "action")?;
        if let Some(session_id) = session_id {
            require_id(session_id, "session_id")?;
        }

        let entry = AuditEntry {
            id: Uuid::new_v4(),
            session_id: session_id.map(|s| s.to_string()),
            actor: actor.to_string(),
            action: action.to_string(),
            detail,
            at: Utc::now(),
        };

        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    /// Every audit record, oldest first
    pub async fn all(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }

    /// Audit records of one session, oldest first
    pub async fn by_session(&self, session_id: &str) -> Result<Vec<AuditEntry>, RegistryError> {
        require_id(session_id, "session_id")?;

        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|entry| entry.session_id.as_deref() == Some(session_id))
            .cloned()
            .collect())
    }

    /// Drop every record of a session. Idempotent; service-level entries
    /// are never touched.
    pub async fn clear_session(&self, session_id: &str) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|entry| entry.session_id.as_deref() != Some(session_id));
        before - entries.len()
    }

    /// Total number of audit records
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_and_filter_by_session() {
        let registry = AuditLogRegistry::new();

        registry
            .append(Some("s1"), "alice", "lock.acquire", None)
            .await
            .unwrap();
        registry
            .append(Some("s2"), "bob", "lock.acquire", None)
            .await
            .unwrap();
        registry
            .append(None, "system", "sweep", Some("removed 3".to_string()))
            .await
            .unwrap();

        assert_eq!(registry.all().await.len(), 3);

        let s1 = registry.by_session("s1").await.unwrap();
        assert_eq!(s1.len(), 1);
        assert_eq!(s1[0].actor, "alice");
    }

    #[tokio::test]
    async fn clear_session_spares_service_level_entries() {
        let registry = AuditLogRegistry::new();

        registry
            .append(Some("s1"), "alice", "role.assign", None)
            .await
            .unwrap();
        registry
            .append(Some("s1"), "alice", "role.remove", None)
            .await
            .unwrap();
        registry
            .append(None, "system", "startup", None)
            .await
            .unwrap();

        assert_eq!(registry.clear_session("s1").await, 2);
        assert_eq!(registry.clear_session("s1").await, 0);
        assert_eq!(registry.entry_count().await, 1);
    }

    #[tokio::test]
    async fn rejects_empty_actor_or_action() {
        let registry = AuditLogRegistry::new();

        let err = registry
            .append(Some("s1"), "", "lock.acquire", None)
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::MissingIdentifier("actor"));

        let err = registry
            .append(Some("s1"), "alice", " ", None)
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::MissingIdentifier("action"));
    }
}
