use crate::config::Config;
use crate::models::SessionClearSummary;
use crate::registries::{
    AuditLogRegistry, FileLockRegistry, HistoryRegistry, PermissionRegistry, PresenceRegistry,
    RoleRegistry,
};
use crate::ws::dispatcher::NotificationDispatcher;

/// All in-memory registries plus the notification fan-out.
///
/// State is process-local and non-durable; everything here dies with
/// the process. Registries never call each other; the only cross-cutting
/// path is the dispatcher, which handlers invoke to announce changes.
pub struct AppState {
    pub presence: PresenceRegistry,
    pub locks: FileLockRegistry,
    pub roles: RoleRegistry,
    pub permissions: PermissionRegistry,
    pub history: HistoryRegistry,
    pub audit: AuditLogRegistry,
    pub dispatcher: NotificationDispatcher,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            presence: PresenceRegistry::new(),
            locks: FileLockRegistry::new(),
            roles: RoleRegistry::new(),
            permissions: PermissionRegistry::new(),
            history: HistoryRegistry::new(),
            audit: AuditLogRegistry::new(),
            dispatcher: NotificationDispatcher::new(config.notify_channel_capacity),
        }
    }

    /// Remove the session from every registry and release all of its
    /// file locks. Idempotent: clearing a session nobody wrote to is a
    /// no-op reporting zero removals.
    pub async fn clear_session(&self, session_id: &str) -> SessionClearSummary {
        SessionClearSummary {
            presence_removed: self.presence.clear_session(session_id).await,
            locks_released: self.locks.release_session(session_id).await.len(),
            roles_removed: self.roles.clear_session(session_id).await,
            permission_sets_removed: self.permissions.clear_session(session_id).await,
            history_removed: self.history.clear_session(session_id).await,
            audit_removed: self.audit.clear_session(session_id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CursorPosition;

    fn state() -> AppState {
        AppState::new(&Config::default())
    }

    async fn populate(state: &AppState, session: &str) {
        state
            .presence
            .upsert(
                session,
                "alice",
                CursorPosition {
                    file_id: None,
                    line: 0,
                    column: 0,
                },
            )
            .await
            .unwrap();
        state
            .locks
            .acquire(&format!("{}-file", session), "alice", session)
            .await
            .unwrap();
        state.roles.assign(session, "alice", "editor").await.unwrap();
        state
            .permissions
            .grant(session, "alice", "write")
            .await
            .unwrap();
        state
            .history
            .append(session, "alice", "edit", None)
            .await
            .unwrap();
        state
            .audit
            .append(Some(session), "alice", "lock.acquire", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn clear_session_empties_every_registry() {
        let state = state();
        populate(&state, "s1").await;
        populate(&state, "s2").await;

        let summary = state.clear_session("s1").await;
        assert_eq!(
            summary,
            SessionClearSummary {
                presence_removed: 1,
                locks_released: 1,
                roles_removed: 1,
                permission_sets_removed: 1,
                history_removed: 1,
                audit_removed: 1,
            }
        );

        // s1 is gone everywhere
        assert!(state.presence.session_presence("s1").await.unwrap().is_empty());
        assert!(state.locks.query("s1-file").await.unwrap().is_none());
        assert!(state.roles.query("s1", "alice").await.unwrap().is_none());
        assert!(state.permissions.list("s1", "alice").await.unwrap().is_empty());
        assert!(state.history.session_history("s1").await.unwrap().is_empty());
        assert!(state.audit.by_session("s1").await.unwrap().is_empty());

        // s2 is untouched
        assert_eq!(state.presence.user_count("s2").await, 1);
        assert_eq!(state.history.session_history("s2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clearing_twice_is_a_noop_the_second_time() {
        let state = state();
        populate(&state, "s1").await;

        assert!(!state.clear_session("s1").await.is_noop());
        assert!(state.clear_session("s1").await.is_noop());
    }
}
