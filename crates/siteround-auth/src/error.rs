//! Authentication error types.

use siteround_core::error::SiteroundError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session has expired")]
    SessionExpired,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for SiteroundError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::SessionExpired
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => SiteroundError::Unauthenticated {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => SiteroundError::Internal(msg),
        }
    }
}
