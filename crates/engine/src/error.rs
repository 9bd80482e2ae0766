//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`AccountNotFound`] thrown when an operation references a user without an
//!   account.
//! - [`InsufficientBalance`] thrown when a debit would take a balance below 0.
//! - [`InvalidPrecondition`] thrown for non-positive amounts, a non-positive
//!   output level or an invalid rate table.
//! - [`Storage`] thrown when the state store cannot read or write a snapshot.
//!
//!  [`AccountNotFound`]: EngineError::AccountNotFound
//!  [`InsufficientBalance`]: EngineError::InsufficientBalance
//!  [`InvalidPrecondition`]: EngineError::InvalidPrecondition
//!  [`Storage`]: EngineError::Storage
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" account not found!")]
    AccountNotFound(String),
    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),
    #[error("Invalid precondition: {0}")]
    InvalidPrecondition(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AccountNotFound(a), Self::AccountNotFound(b)) => a == b,
            (Self::InsufficientBalance(a), Self::InsufficientBalance(b)) => a == b,
            (Self::InvalidPrecondition(a), Self::InvalidPrecondition(b)) => a == b,
            (Self::Storage(a), Self::Storage(b)) => a == b,
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
