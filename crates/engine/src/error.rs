//! The module contains the errors the engine can return.
//!
//! Every variant is a distinct failure kind so callers can branch on it
//! without looking at messages:
//!
//! - [`Unauthenticated`] no identity could be resolved.
//! - [`NotFound`] the record is absent, or belongs to someone else where
//!   existence must not leak.
//! - [`Forbidden`] the record exists but the caller does not own it.
//! - [`DuplicateName`], [`DuplicateBudget`], [`DuplicateUser`] a uniqueness
//!   rule was violated, either by the pre-check or by the storage index.
//! - [`Validation`] malformed input, rejected before touching storage.
//!
//!  [`Unauthenticated`]: EngineError::Unauthenticated
//!  [`NotFound`]: EngineError::NotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`DuplicateName`]: EngineError::DuplicateName
//!  [`DuplicateBudget`]: EngineError::DuplicateBudget
//!  [`DuplicateUser`]: EngineError::DuplicateUser
//!  [`Validation`]: EngineError::Validation
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("\"{0}\" already present!")]
    DuplicateName(String),
    #[error("Budget already present: {0}")]
    DuplicateBudget(String),
    #[error("User already present: {0}")]
    DuplicateUser(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unauthenticated, Self::Unauthenticated) => true,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::CategoryNotFound(a), Self::CategoryNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::DuplicateName(a), Self::DuplicateName(b)) => a == b,
            (Self::DuplicateBudget(a), Self::DuplicateBudget(b)) => a == b,
            (Self::DuplicateUser(a), Self::DuplicateUser(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvariantViolation(a), Self::InvariantViolation(b)) => a == b,
            (Self::PasswordHash(a), Self::PasswordHash(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

impl From<bcrypt::BcryptError> for EngineError {
    fn from(value: bcrypt::BcryptError) -> Self {
        Self::PasswordHash(value.to_string())
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::InvariantViolation(format!("blocking task failed: {value}"))
    }
}
