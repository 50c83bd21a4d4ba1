use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{HistoryEntry, RegistryError};
use crate::registries::require_id;

/// Append-only per-session change log with truncating rollback.
///
/// Rollback is not undo: everything after the target index is discarded
/// permanently, there is no redo, and the file content the entries
/// describe is never touched.
#[derive(Default)]
pub struct HistoryRegistry {
    histories: RwLock<HashMap<String, Vec<HistoryEntry>>>,
}

impl HistoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a change record, assigning its id and timestamp
    pub async fn append(
        &self,
        session_id: &str,
        user_id: &str,
        action: &str,
        detail: Option<String>,
    ) -> Result<HistoryEntry, RegistryError> {
        require_id(session_id, "session_id")?;
        require_id(user_id, "user_id")?;
        require_id(action, "action")?;

        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            action: action.to_string(),
            detail,
            at: Utc::now(),
        };

        let mut histories = self.histories.write().await;
        histories
            .entry(session_id.to_string())
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    /// Full history of a session, oldest first; empty if none
    pub async fn session_history(
        &self,
        session_id: &str,
    ) -> Result<Vec<HistoryEntry>, RegistryError> {
        require_id(session_id, "session_id")?;

        let histories = self.histories.read().await;
        Ok(histories.get(session_id).cloned().unwrap_or_default())
    }

    /// Truncate the session history so exactly `index + 1` entries remain.
    /// Returns the discarded tail, oldest first.
    pub async fn rollback(
        &self,
        session_id: &str,
        index: usize,
    ) -> Result<Vec<HistoryEntry>, RegistryError> {
        require_id(session_id, "session_id")?;

        let mut histories = self.histories.write().await;
        let entries = histories
            .get_mut(session_id)
            .ok_or_else(|| RegistryError::SessionNotFound(session_id.to_string()))?;

        if index >= entries.len() {
            return Err(RegistryError::InvalidRollbackIndex {
                index,
                len: entries.len(),
            });
        }

        let discarded = entries.split_off(index + 1);
        warn!(
            "History rollback on session '{}' discarded {} entries",
            session_id,
            discarded.len()
        );
        Ok(discarded)
    }

    /// Drop the whole history of a session. Idempotent.
    pub async fn clear_session(&self, session_id: &str) -> usize {
        let mut histories = self.histories.write().await;
        let removed = histories
            .remove(session_id)
            .map(|entries| entries.len())
            .unwrap_or(0);
        if removed > 0 {
            info!(
                "Cleared {} history entries for session '{}'",
                removed, session_id
            );
        }
        removed
    }

    /// History entries across all sessions
    pub async fn entry_count(&self) -> usize {
        self.histories
            .read()
            .await
            .values()
            .map(|entries| entries.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(registry: &HistoryRegistry, session: &str, n: usize) {
        for i in 0..n {
            registry
                .append(session, "alice", &format!("edit-{}", i), None)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn append_preserves_order() {
        let registry = HistoryRegistry::new();
        seed(&registry, "s1", 3).await;

        let entries = registry.session_history("s1").await.unwrap();
        let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["edit-0", "edit-1", "edit-2"]);
    }

    #[tokio::test]
    async fn rollback_leaves_index_plus_one_entries() {
        let registry = HistoryRegistry::new();
        seed(&registry, "s1", 5).await;

        let discarded = registry.rollback("s1", 2).await.unwrap();
        assert_eq!(discarded.len(), 2);

        let remaining = registry.session_history("s1").await.unwrap();
        assert_eq!(remaining.len(), 3);
        assert_eq!(remaining.last().unwrap().action, "edit-2");
    }

    #[tokio::test]
    async fn rollback_to_last_index_discards_nothing() {
        let registry = HistoryRegistry::new();
        seed(&registry, "s1", 3).await;

        let discarded = registry.rollback("s1", 2).await.unwrap();
        assert!(discarded.is_empty());
        assert_eq!(registry.session_history("s1").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn rollback_out_of_range_fails() {
        let registry = HistoryRegistry::new();
        seed(&registry, "s1", 3).await;

        let err = registry.rollback("s1", 3).await.unwrap_err();
        assert_eq!(err, RegistryError::InvalidRollbackIndex { index: 3, len: 3 });
    }

    #[tokio::test]
    async fn rollback_on_unknown_session_fails() {
        let registry = HistoryRegistry::new();

        let err = registry.rollback("ghost", 0).await.unwrap_err();
        assert_eq!(err, RegistryError::SessionNotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn clear_session_is_idempotent() {
        let registry = HistoryRegistry::new();
        seed(&registry, "s1", 4).await;

        assert_eq!(registry.clear_session("s1").await, 4);
        assert_eq!(registry.clear_session("s1").await, 0);
    }
}
