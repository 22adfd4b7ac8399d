use std::fmt;

use super::auth::{PasswordError, TokenError};
use super::domain::ApplicationStatus;
use super::repository::{EntityKind, RepositoryError, UniqueField};
use super::validation::ValidationError;

/// Why the access policy refused an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// No valid token accompanied the call.
    Anonymous,
    /// The caller is known but lacks the right for `action`.
    Forbidden { action: &'static str },
    /// The acting account is missing or deactivated.
    Suspended,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::Anonymous => f.write_str("authentication required"),
            Denial::Forbidden { action } => write!(f, "not permitted to {action}"),
            Denial::Suspended => f.write_str("account is inactive"),
        }
    }
}

/// Failure surfaced by every directory, catalog and ledger operation.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: EntityKind, id: String },
    #[error("{field} is already registered")]
    DuplicateField { field: UniqueField },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("cannot move application from {from} to {requested}")]
    InvalidTransition {
        from: ApplicationStatus,
        requested: ApplicationStatus,
    },
    #[error("unauthorized: {0}")]
    Unauthorized(Denial),
    #[error("internal error: {0}")]
    Internal(String),
}

impl BoardError {
    pub fn not_found(entity: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn forbidden(action: &'static str) -> Self {
        Self::Unauthorized(Denial::Forbidden { action })
    }
}

impl From<RepositoryError> for BoardError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Duplicate { field } => Self::DuplicateField { field },
            RepositoryError::Missing { entity, id } => Self::NotFound { entity, id },
            RepositoryError::StatusConflict { current } => {
                Self::Internal(format!("unexpected status conflict: application is {current}"))
            }
            RepositoryError::Unavailable(reason) => Self::Internal(reason),
        }
    }
}

impl From<PasswordError> for BoardError {
    fn from(value: PasswordError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<TokenError> for BoardError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Expired | TokenError::Invalid => Self::Unauthorized(Denial::Anonymous),
            TokenError::Signing => Self::Internal(value.to_string()),
        }
    }
}
