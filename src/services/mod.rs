use thiserror::Error;

use crate::domain::auth::Session;
use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod admin;
pub mod catalog;
pub mod contact;
pub mod dashboard;
pub mod engagement;
pub mod lead;
pub mod listing;

/// Generic alert text when the server gave no usable message.
pub const GENERIC_FAILURE: &str = "Something went wrong, please try again.";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    TypeConstraint(#[from] TypeConstraintError),

    #[error(transparent)]
    Repository(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Unauthorized(_) => ServiceError::Unauthorized,
            other => ServiceError::Repository(other),
        }
    }
}

impl ServiceError {
    /// Text for a blocking alert: the server's message when it sent one.
    pub fn alert_message(&self) -> String {
        match self {
            ServiceError::Repository(err) => err
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            ServiceError::Form(err) => err.to_string(),
            ServiceError::TypeConstraint(err) => err.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Admin operations need a session with a non-empty token.
pub(crate) fn require_session(session: Option<&Session>) -> ServiceResult<&Session> {
    session
        .filter(|s| !s.jwt.trim().is_empty())
        .ok_or(ServiceError::Unauthorized)
}
