//! Authentication configuration.

/// Configuration for token issuance and password hashing.
///
/// Loaded once at startup; a missing token secret is a fatal startup
/// condition handled by the server binary, not a per-call error.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared secret for HS256 token signing and verification.
    pub token_secret: String,
    /// Bearer token lifetime in seconds (default: 604_800 = 7 days).
    pub token_lifetime_secs: u64,
    /// Optional pepper prepended to passwords before Argon2id hashing.
    pub pepper: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            token_lifetime_secs: 604_800,
            pepper: None,
        }
    }
}
