use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for register-time password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must not be empty")]
    Empty,

    #[error("Password too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for PersonName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersonNameError {
    #[error("must not be empty")]
    Empty,

    #[error("too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Input rejected before any collaborator is consulted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),

    #[error("Invalid first name: {0}")]
    FirstName(PersonNameError),

    #[error("Invalid last name: {0}")]
    LastName(PersonNameError),
}

/// Failure reported by an identity store adapter.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Stored record is invalid: {0}")]
    InvalidRecord(String),
}

/// Which side of the boundary can fix a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultClass {
    Client,
    System,
}

/// Stable, machine-readable failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DuplicateIdentity,
    IdentityNotFound,
    InvalidCredential,
    InvalidToken,
    ValidationError,
    StoreUnavailable,
    SigningFailure,
    HashingFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DuplicateIdentity => "duplicate_identity",
            ErrorKind::IdentityNotFound => "identity_not_found",
            ErrorKind::InvalidCredential => "invalid_credential",
            ErrorKind::InvalidToken => "invalid_token",
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::StoreUnavailable => "store_unavailable",
            ErrorKind::SigningFailure => "signing_failure",
            ErrorKind::HashingFailure => "hashing_failure",
        }
    }

    pub fn fault(&self) -> FaultClass {
        match self {
            ErrorKind::DuplicateIdentity
            | ErrorKind::IdentityNotFound
            | ErrorKind::InvalidCredential
            | ErrorKind::InvalidToken
            | ErrorKind::ValidationError => FaultClass::Client,
            ErrorKind::StoreUnavailable | ErrorKind::SigningFailure | ErrorKind::HashingFailure => {
                FaultClass::System
            }
        }
    }
}

/// Top-level error for register, login and token verification.
///
/// System-fault variants carry no collaborator detail; that detail is logged
/// where the failure is classified.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Identity already exists: {0}")]
    DuplicateIdentity(String),

    #[error("Identity not found: {0}")]
    IdentityNotFound(String),

    #[error("Invalid password")]
    InvalidCredential,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Identity store unavailable, retry later")]
    StoreUnavailable,

    #[error("Token signing failed, retry later")]
    SigningFailure,

    #[error("Credential hashing failed, retry later")]
    HashingFailure,
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::DuplicateIdentity(_) => ErrorKind::DuplicateIdentity,
            AuthError::IdentityNotFound(_) => ErrorKind::IdentityNotFound,
            AuthError::InvalidCredential => ErrorKind::InvalidCredential,
            AuthError::InvalidToken => ErrorKind::InvalidToken,
            AuthError::Validation(_) => ErrorKind::ValidationError,
            AuthError::StoreUnavailable => ErrorKind::StoreUnavailable,
            AuthError::SigningFailure => ErrorKind::SigningFailure,
            AuthError::HashingFailure => ErrorKind::HashingFailure,
        }
    }

    pub fn is_client_fault(&self) -> bool {
        self.kind().fault() == FaultClass::Client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_classification() {
        let client = [
            AuthError::DuplicateIdentity("a@x.com".to_string()),
            AuthError::IdentityNotFound("a@x.com".to_string()),
            AuthError::InvalidCredential,
            AuthError::InvalidToken,
            AuthError::Validation(PasswordPolicyError::Empty.into()),
        ];
        let system = [
            AuthError::StoreUnavailable,
            AuthError::SigningFailure,
            AuthError::HashingFailure,
        ];

        assert!(client.iter().all(AuthError::is_client_fault));
        assert!(!system.iter().any(AuthError::is_client_fault));
    }

    #[test]
    fn test_kind_serializes_as_stable_string() {
        for kind in [
            ErrorKind::DuplicateIdentity,
            ErrorKind::InvalidToken,
            ErrorKind::StoreUnavailable,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
        }
    }

    #[test]
    fn test_validation_message_names_the_field() {
        let err = AuthError::from(ValidationError::LastName(PersonNameError::Empty));
        assert_eq!(err.to_string(), "Invalid last name: must not be empty");
    }
}
