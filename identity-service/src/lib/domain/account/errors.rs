use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role '{0}' (expected vendor or buyer)")]
pub struct RoleError(pub String);

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for PhoneNumber validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneError {
    #[error("Phone number must contain only digits after an optional leading '+'")]
    InvalidCharacters,

    #[error("Phone number must have between {min} and {max} digits, got {actual}")]
    InvalidLength {
        min: usize,
        max: usize,
        actual: usize,
    },
}

/// Error for Ntn validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NtnError {
    #[error("NTN too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("NTN may contain only letters, digits, and '-'")]
    InvalidCharacters,
}

/// Error for enumerated field parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("'{value}' is not one of: {allowed}")]
pub struct ChoiceError {
    pub value: String,
    pub allowed: &'static str,
}

/// A single offending input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Malformed or missing registration input, naming every offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn push(&mut self, field: &'static str, message: impl ToString) {
        self.fields.push(FieldError {
            field,
            message: message.to_string(),
        });
    }

    /// Names of the offending fields, in input order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.field).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid input")?;
        for (i, error) in self.fields.iter().enumerate() {
            let separator = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}: {}", separator, error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Uniqueness violation, addressable per field.
///
/// Each flag is reported independently so a caller learns about every
/// conflicting field at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConflictError {
    pub email_exists: bool,
    pub mobile_exists: bool,
    pub ntn_exists: bool,
}

impl ConflictError {
    pub fn email() -> Self {
        Self {
            email_exists: true,
            ..Self::default()
        }
    }

    pub fn mobile() -> Self {
        Self {
            mobile_exists: true,
            ..Self::default()
        }
    }

    pub fn ntn() -> Self {
        Self {
            ntn_exists: true,
            ..Self::default()
        }
    }

    pub fn any(&self) -> bool {
        self.email_exists || self.mobile_exists || self.ntn_exists
    }
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = [
            (self.email_exists, "email"),
            (self.mobile_exists, "mobile"),
            (self.ntn_exists, "ntn"),
        ]
        .into_iter()
        .filter_map(|(hit, name)| hit.then_some(name))
        .collect();

        if fields.is_empty() {
            write!(f, "Account already exists")
        } else {
            write!(f, "Already registered: {}", fields.join(", "))
        }
    }
}

impl std::error::Error for ConflictError {}

/// Failures reported by an account store.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write.
    #[error("Unique constraint violated: {0}")]
    Conflict(ConflictError),

    #[error("Store operation timed out")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}

/// Top-level error for account registration
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Conflict(#[from] ConflictError),

    #[error("Registration failed: {0}")]
    Persistence(String),
}

impl From<RepositoryError> for RegistrationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(conflict) => RegistrationError::Conflict(conflict),
            RepositoryError::Timeout | RepositoryError::Database(_) => {
                RegistrationError::Persistence(err.to_string())
            }
        }
    }
}

/// Error for reading a stored account back
#[derive(Debug, Clone, Error)]
pub enum AccountLookupError {
    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Account lookup failed: {0}")]
    Persistence(String),
}

impl From<RepositoryError> for AccountLookupError {
    fn from(err: RepositoryError) -> Self {
        AccountLookupError::Persistence(err.to_string())
    }
}
