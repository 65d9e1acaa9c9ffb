use crate::roles::AccessDenied;
use crate::types::DbId;

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Duplicate identity, duplicate name, or a change the current state forbids.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The single, cause-agnostic login failure.
    pub fn invalid_credentials() -> Self {
        CoreError::Unauthorized(INVALID_CREDENTIALS.into())
    }
}

impl From<AccessDenied> for CoreError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::NotAuthenticated => CoreError::Unauthorized(denied.to_string()),
            AccessDenied::InsufficientPrivilege { .. } => CoreError::Forbidden(denied.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::roles::Role;

    #[test]
    fn denial_maps_to_unauthorized_or_forbidden() {
        assert_matches!(
            CoreError::from(AccessDenied::NotAuthenticated),
            CoreError::Unauthorized(_)
        );
        let err = CoreError::from(AccessDenied::InsufficientPrivilege {
            required: Role::Staff,
            actual: Role::Customer,
        });
        assert_matches!(err, CoreError::Forbidden(msg) if msg == "staff role or above required");
    }
}
