//! Stagedoor Auth — password hashing, bearer token issue/verify, the
//! identity service, and request-side authentication and guards.

pub mod authn;
pub mod config;
pub mod error;
pub mod guard;
pub mod password;
pub mod service;
pub mod token;

pub use authn::RequestAuthenticator;
pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthSession, FederatedProfile, IdentityService, RegisterInput, UserProfile};
pub use token::Claims;
