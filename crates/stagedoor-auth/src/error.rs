//! Authentication error types.

use stagedoor_core::error::StagedoorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no password set for this account")]
    NoPasswordSet,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("missing bearer token")]
    MissingToken,

    #[error("token subject no longer exists")]
    UnknownUser,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for StagedoorError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => StagedoorError::InvalidCredentials,
            AuthError::NoPasswordSet => StagedoorError::NoPasswordSet,
            AuthError::EmptyPassword => StagedoorError::Validation {
                message: "Password must not be empty".into(),
            },
            AuthError::TokenExpired => StagedoorError::TokenExpired,
            AuthError::TokenInvalid(_) => StagedoorError::TokenInvalid,
            AuthError::MissingToken => StagedoorError::MissingToken,
            AuthError::UnknownUser => StagedoorError::UnknownUser,
            AuthError::Crypto(msg) => StagedoorError::Crypto(msg),
        }
    }
}
