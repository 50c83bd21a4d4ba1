pub mod audit;
pub mod diagnostics;
pub mod health;
pub mod history;
pub mod locks;
pub mod notifications;
pub mod permissions;
pub mod presence;
pub mod sessions;

use axum::{http::StatusCode, Json};

use crate::models::{ErrorResponse, RegistryError};

/// Translate a registry error into an HTTP error envelope
pub(crate) fn registry_error(err: RegistryError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        RegistryError::MissingIdentifier(_) | RegistryError::InvalidRollbackIndex { .. } => {
            StatusCode::BAD_REQUEST
        }
        RegistryError::AlreadyLocked { .. } => StatusCode::CONFLICT,
        RegistryError::LockNotFound(_) | RegistryError::SessionNotFound(_) => StatusCode::NOT_FOUND,
    };
    (
        status,
        Json(ErrorResponse::new(status.as_u16(), err.to_string())),
    )
}
