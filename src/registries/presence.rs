use std::collections::HashMap;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{CursorPosition, PresenceEntry, RegistryError};
use crate::registries::require_id;

/// Per-session, per-user cursor position and last-seen time.
///
/// Sessions are implicit: a session appears on the first upsert keyed by
/// it and disappears when its last entry is removed. Entries only leave
/// the registry through an explicit remove, a session clear, or a
/// caller-triggered inactivity sweep; there is no internal timer.
#[derive(Default)]
pub struct PresenceRegistry {
    sessions: RwLock<HashMap<String, HashMap<String, PresenceEntry>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create-or-replace the presence of a user, stamping `last_seen = now`.
    /// Repeated upserts for the same (session, user) never duplicate.
    pub async fn upsert(
        &self,
        session_id: &str,
        user_id: &str,
        cursor: CursorPosition,
    ) -> Result<PresenceEntry, RegistryError> {
        require_id(session_id, "session_id")?;
        require_id(user_id, "user_id")?;

        let entry = PresenceEntry {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            cursor,
            last_seen: Utc::now(),
        };

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .insert(user_id.to_string(), entry.clone());

        Ok(entry)
    }

    /// Snapshot of all presence entries in a session; empty if the session
    /// holds no entries.
    pub async fn session_presence(
        &self,
        session_id: &str,
    ) -> Result<Vec<PresenceEntry>, RegistryError> {
        require_id(session_id, "session_id")?;

        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .map(|users| users.values().cloned().collect())
            .unwrap_or_default())
    }

    /// Remove one user from a session. Removing the last user removes the
    /// session itself. Returns whether an entry was actually removed.
    pub async fn remove_user(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<bool, RegistryError> {
        require_id(session_id, "session_id")?;
        require_id(user_id, "user_id")?;

        let mut sessions = self.sessions.write().await;
        let removed = match sessions.get_mut(session_id) {
            Some(users) => users.remove(user_id).is_some(),
            None => false,
        };
        if removed && sessions.get(session_id).is_some_and(|u| u.is_empty()) {
            sessions.remove(session_id);
        }
        Ok(removed)
    }

    /// Remove every entry of a session. Idempotent; returns the number of
    /// entries removed.
    pub async fn clear_session(&self, session_id: &str) -> usize {
        let mut sessions = self.sessions.write().await;
        sessions
            .remove(session_id)
            .map(|users| users.len())
            .unwrap_or(0)
    }

    /// Remove every entry whose `last_seen` is older than the threshold.
    /// Sessions emptied by the sweep vanish. Returns the removed entries.
    pub async fn sweep_inactive(&self, threshold: Duration) -> Vec<PresenceEntry> {
        let cutoff = Utc::now() - threshold;
        let mut removed = Vec::new();

        let mut sessions = self.sessions.write().await;
        for users in sessions.values_mut() {
            users.retain(|_, entry| {
                if entry.last_seen < cutoff {
                    removed.push(entry.clone());
                    false
                } else {
                    true
                }
            });
        }
        sessions.retain(|_, users| !users.is_empty());

        if !removed.is_empty() {
            debug!("Presence sweep removed {} inactive entries", removed.len());
        }
        removed
    }

    /// Number of sessions holding at least one presence entry
    pub async fn active_session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of users present in a session
    pub async fn user_count(&self, session_id: &str) -> usize {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|users| users.len())
            .unwrap_or(0)
    }

    /// Total presence entries across all sessions
    pub async fn entry_count(&self) -> usize {
        self.sessions
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

    fn cursor(line: u32) -> CursorPosition {
        CursorPosition {
            file_id: Some("file-1".to_string()),
            line,
            column: 0,
        }
    }

    #[tokio::test]
    async fn upsert_creates_exactly_one_entry() {
        let registry = PresenceRegistry::new();

        registry.upsert("s1", "alice", cursor(1)).await.unwrap();
        registry.upsert("s1", "alice", cursor(2)).await.unwrap();
        registry.upsert("s1", "alice", cursor(3)).await.unwrap();

        let entries = registry.session_presence("s1").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].cursor.line, 3);
    }

    #[tokio::test]
    async fn upsert_refreshes_last_seen() {
        let registry = PresenceRegistry::new();

        let first = registry.upsert("s1", "alice", cursor(1)).await.unwrap();
        let second = registry.upsert("s1", "alice", cursor(1)).await.unwrap();
        assert!(second.last_seen >= first.last_seen);
    }

    #[tokio::test]
    async fn rejects_empty_identifiers() {
        let registry = PresenceRegistry::new();

        let err = registry.upsert("", "alice", cursor(1)).await.unwrap_err();
        assert_eq!(err, RegistryError::MissingIdentifier("session_id"));

        let err = registry.upsert("s1", "  ", cursor(1)).await.unwrap_err();
        assert_eq!(err, RegistryError::MissingIdentifier("user_id"));
    }

    #[tokio::test]
    async fn removing_last_user_removes_session() {
        let registry = PresenceRegistry::new();

        registry.upsert("s1", "alice", cursor(1)).await.unwrap();
        registry.upsert("s1", "bob", cursor(1)).await.unwrap();
        assert_eq!(registry.active_session_count().await, 1);

        assert!(registry.remove_user("s1", "alice").await.unwrap());
        assert_eq!(registry.active_session_count().await, 1);

        assert!(registry.remove_user("s1", "bob").await.unwrap());
        assert_eq!(registry.active_session_count().await, 0);
    }

    #[tokio::test]
    async fn remove_unknown_user_reports_false() {
        let registry = PresenceRegistry::new();
        assert!(!registry.remove_user("s1", "ghost").await.unwrap());
    }

    #[tokio::test]
    async fn clear_session_is_idempotent() {
        let registry = PresenceRegistry::new();

        registry.upsert("s1", "alice", cursor(1)).await.unwrap();
        registry.upsert("s1", "bob", cursor(1)).await.unwrap();

        assert_eq!(registry.clear_session("s1").await, 2);
        assert_eq!(registry.clear_session("s1").await, 0);
        assert_eq!(registry.active_session_count().await, 0);
    }

    #[tokio::test]
    async fn sweep_removes_only_stale_entries() {
        let registry = PresenceRegistry::new();

        registry.upsert("s1", "alice", cursor(1)).await.unwrap();
        registry.upsert("s2", "bob", cursor(1)).await.unwrap();

        // Backdate alice so only she falls behind the cutoff
        {
            let mut sessions = registry.sessions.write().await;
            let entry = sessions
                .get_mut("s1")
                .and_then(|users| users.get_mut("alice"))
                .unwrap();
            entry.last_seen = Utc::now() - Duration::seconds(600);
        }

        let removed = registry.sweep_inactive(Duration::seconds(300)).await;
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].user_id, "alice");

        // s1 was emptied by the sweep, s2 survives
        assert_eq!(registry.active_session_count().await, 1);
        assert_eq!(registry.user_count("s2").await, 1);
    }
}
