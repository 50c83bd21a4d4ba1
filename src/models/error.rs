use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for an error
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: u16,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: u16, error: String) -> Self {
        Self {
            success: false,
            code,
            error,
        }
    }
}

/// Errors raised by the in-memory registries.
///
/// Every registry operation validates its identifiers up front and fails
/// loudly on invariant violations. Callers translate these into HTTP
/// error envelopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A required identifier (session_id / user_id / file_id) was empty
    MissingIdentifier(&'static str),
    /// The file already carries a lock held by someone else
    AlreadyLocked { file_id: String, locked_by: String },
    /// No lock exists for the file
    LockNotFound(String),
    /// The session has no entries in the registry being queried
    SessionNotFound(String),
    /// Rollback index is out of range for the session history
    InvalidRollbackIndex { index: usize, len: usize },
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::MissingIdentifier(name) => {
                write!(f, "Missing required identifier: {}", name)
            }
            RegistryError::AlreadyLocked { file_id, locked_by } => {
                write!(f, "File '{}' is already locked by '{}'", file_id, locked_by)
            }
            RegistryError::LockNotFound(file_id) => {
                write!(f, "File '{}' is not locked", file_id)
            }
            RegistryError::SessionNotFound(session_id) => {
                write!(f, "Session '{}' not found", session_id)
            }
            RegistryError::InvalidRollbackIndex { index, len } => {
                write!(
                    f,
                    "Rollback index {} is out of range for a history of {} entries",
                    index, len
                )
            }
        }
    }
}

impl std::error::Error for RegistryError {}
