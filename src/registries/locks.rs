use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::{FileLock, RegistryError};
use crate::registries::require_id;

/// Exclusive locks on file identifiers, one holder per file.
///
/// No queueing, no waiting, no expiry: an acquire against a locked file
/// fails loudly and the original lock stays untouched. A lock persists
/// until released explicitly or bulk-released when its session clears.
#[derive(Default)]
pub struct FileLockRegistry {
    locks: RwLock<HashMap<String, FileLock>>,
}

impl FileLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a lock on a file. The existence check and the insert run
    /// under one write guard, so no other task can slip in between.
    pub async fn acquire(
        &self,
        file_id: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<FileLock, RegistryError> {
        require_id(file_id, "file_id")?;
        require_id(user_id, "user_id")?;
        require_id(session_id, "session_id")?;

        let mut locks = self.locks.write().await;
        if let Some(existing) = locks.get(file_id) {
            return Err(RegistryError::AlreadyLocked {
                file_id: file_id.to_string(),
                locked_by: existing.locked_by.clone(),
            });
        }

        let lock = FileLock {
            file_id: file_id.to_string(),
            locked_by: user_id.to_string(),
            session_id: session_id.to_string(),
            locked_at: Utc::now(),
        };
        locks.insert(file_id.to_string(), lock.clone());
        info!("File '{}' locked by '{}'", file_id, user_id);
        Ok(lock)
    }

    /// Release the lock on a file; fails when the file is not locked.
    pub async fn release(&self, file_id: &str) -> Result<FileLock, RegistryError> {
        require_id(file_id, "file_id")?;

        let mut locks = self.locks.write().await;
        match locks.remove(file_id) {
            Some(lock) => {
                info!("File '{}' unlocked", file_id);
                Ok(lock)
            }
            None => Err(RegistryError::LockNotFound(file_id.to_string())),
        }
    }

    /// Current lock on a file, if any
    pub async fn query(&self, file_id: &str) -> Result<Option<FileLock>, RegistryError> {
        require_id(file_id, "file_id")?;
        Ok(self.locks.read().await.get(file_id).cloned())
    }

    /// Release every lock held under a session. Returns the released locks.
    pub async fn release_session(&self, session_id: &str) -> Vec<FileLock> {
        let mut released = Vec::new();
        let mut locks = self.locks.write().await;
        locks.retain(|_, lock| {
            if lock.session_id == session_id {
                released.push(lock.clone());
                false
            } else {
                true
            }
        });
        if !released.is_empty() {
            info!(
                "Released {} locks held by session '{}'",
                released.len(),
                session_id
            );
        }
        released
    }

    /// Number of files currently locked
    pub async fn lock_count(&self) -> usize {
        self.locks.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_on_locked_file_fails_and_keeps_original() {
        let registry = FileLockRegistry::new();

        let original = registry.acquire("f1", "alice", "s1").await.unwrap();

        let err = registry.acquire("f1", "bob", "s2").await.unwrap_err();
        assert_eq!(
            err,
            RegistryError::AlreadyLocked {
                file_id: "f1".to_string(),
                locked_by: "alice".to_string(),
            }
        );

        let current = registry.query("f1").await.unwrap().unwrap();
        assert_eq!(current.locked_by, original.locked_by);
        assert_eq!(current.session_id, original.session_id);
        assert_eq!(current.locked_at, original.locked_at);
    }

    #[tokio::test]
    async fn release_of_unlocked_file_fails() {
        let registry = FileLockRegistry::new();

        let err = registry.release("f1").await.unwrap_err();
        assert_eq!(err, RegistryError::LockNotFound("f1".to_string()));
    }

    #[tokio::test]
    async fn release_returns_the_lock_and_frees_the_file() {
        let registry = FileLockRegistry::new();

        registry.acquire("f1", "alice", "s1").await.unwrap();
        let released = registry.release("f1").await.unwrap();
        assert_eq!(released.locked_by, "alice");

        assert!(registry.query("f1").await.unwrap().is_none());
        // The file can be locked again once released
        registry.acquire("f1", "bob", "s2").await.unwrap();
    }

    #[tokio::test]
    async fn rejects_empty_identifiers() {
        let registry = FileLockRegistry::new();

        let err = registry.acquire("", "alice", "s1").await.unwrap_err();
        assert_eq!(err, RegistryError::MissingIdentifier("file_id"));

        let err = registry.release(" ").await.unwrap_err();
        assert_eq!(err, RegistryError::MissingIdentifier("file_id"));
    }

    #[tokio::test]
    async fn release_session_only_touches_that_session() {
        let registry = FileLockRegistry::new();

        registry.acquire("f1", "alice", "s1").await.unwrap();
        registry.acquire("f2", "alice", "s1").await.unwrap();
        registry.acquire("f3", "bob", "s2").await.unwrap();

        let released = registry.release_session("s1").await;
        assert_eq!(released.len(), 2);
        assert_eq!(registry.lock_count().await, 1);
        assert!(registry.query("f3").await.unwrap().is_some());

        // Idempotent: nothing left to release
        assert!(registry.release_session("s1").await.is_empty());
    }
}
