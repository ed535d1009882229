use thiserror::Error;

use crate::account::errors::RepositoryError;

/// Login and token validation failures.
///
/// `InvalidCredentials` deliberately does not say whether the email or the
/// password was wrong.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    /// The identity store could not be consulted.
    #[error("Authentication unavailable: {0}")]
    Unavailable(String),

    #[error("Token issuance failed: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        AuthError::Unavailable(err.to_string())
    }
}
