//! Error types for the siteround system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteroundError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Unauthenticated: {reason}")]
    Unauthenticated { reason: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type SiteroundResult<T> = Result<T, SiteroundError>;
