//! Request authentication: bearer token extraction and resolution.

use stagedoor_core::error::{StagedoorError, StagedoorResult};
use stagedoor_core::models::identity::AuthenticatedIdentity;
use stagedoor_core::repository::IdentityStore;

use crate::config::AuthConfig;
use crate::token;

/// Per-call authenticator: verifies a bearer token and resolves its
/// subject to a live identity.
///
/// Role and tenant come from the store row, never from the token, so
/// a role change takes effect on the next call without reissuing.
pub struct RequestAuthenticator<S: IdentityStore> {
    store: S,
    config: AuthConfig,
}

impl<S: IdentityStore> RequestAuthenticator<S> {
    pub fn new(store: S, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Authenticate one inbound call from its `Authorization` header
    /// value.
    ///
    /// A missing header, a non-Bearer scheme, and an empty token all
    /// fail with `MissingToken`. A verified token whose subject no
    /// longer exists fails with `UnknownUser`.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> StagedoorResult<AuthenticatedIdentity> {
        // 1. Extract the bearer token.
        let token = authorization
            .and_then(|header| header.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
            .ok_or(StagedoorError::MissingToken)?;

        // 2. Verify signature and expiry.
        let user_id = token::verify_token(token, &self.config)?;

        // 3. The subject must still exist; tokens outlive deletions.
        let found = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(StagedoorError::UnknownUser)?;

        Ok(AuthenticatedIdentity::from(&found))
    }
}
