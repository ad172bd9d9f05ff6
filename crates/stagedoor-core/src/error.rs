//! Error types for the stagedoor system.
//!
//! Every operation in the identity core returns one of these variants
//! as a typed result; nothing is retried automatically. Display
//! strings are the client-facing messages surfaced by the routing
//! layer.

use thiserror::Error;

/// Field protected by a global uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Subdomain,
}

impl UniqueField {
    /// Client-facing message for a conflict on this field.
    pub fn conflict_message(self) -> &'static str {
        match self {
            UniqueField::Email => "User already exists with this email",
            UniqueField::Subdomain => "Subdomain already taken",
        }
    }
}

#[derive(Debug, Error)]
pub enum StagedoorError {
    /// Caller-supplied data is malformed. Most validation happens in
    /// the routing layer before the core is reached.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A uniqueness constraint on email or subdomain rejected the
    /// write.
    #[error("{}", .field.conflict_message())]
    Conflict { field: UniqueField },

    /// Unknown email or wrong password. The message is identical for
    /// both so callers cannot probe which emails are registered.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The account exists but carries no password hash (federated
    /// sign-up). Distinct variant, same client-facing message as
    /// [`StagedoorError::InvalidCredentials`].
    #[error("Invalid email or password")]
    NoPasswordSet,

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    /// No bearer token on the call. Unauthorized class.
    #[error("Access token required")]
    MissingToken,

    /// Token signature or structure failed verification. Forbidden
    /// class.
    #[error("Invalid token")]
    TokenInvalid,

    /// Token verified but is past its expiry claim. Forbidden class.
    #[error("Token has expired")]
    TokenExpired,

    /// Token verified but its subject no longer exists in the store.
    /// Unauthorized class.
    #[error("User not found")]
    UnknownUser,

    /// A guard ran without an authenticated identity attached.
    /// Unauthorized class.
    #[error("Authentication required")]
    MissingIdentity,

    /// Authenticated but not authorized for the operation.
    #[error("Access denied: {reason}")]
    Forbidden { reason: String },

    /// Crypto-stack fault during hashing or token signing.
    #[error("Cryptography error: {0}")]
    Crypto(String),

    /// Persistence-layer fault (connection loss, transaction abort).
    /// Distinct from business failures so callers can tell bad input
    /// from infrastructure being down.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type StagedoorResult<T> = Result<T, StagedoorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_failures_share_a_message() {
        assert_eq!(
            StagedoorError::InvalidCredentials.to_string(),
            StagedoorError::NoPasswordSet.to_string(),
        );
    }

    #[test]
    fn conflict_names_the_field() {
        let email = StagedoorError::Conflict {
            field: UniqueField::Email,
        };
        let subdomain = StagedoorError::Conflict {
            field: UniqueField::Subdomain,
        };
        assert_eq!(email.to_string(), "User already exists with this email");
        assert_eq!(subdomain.to_string(), "Subdomain already taken");
    }
}
