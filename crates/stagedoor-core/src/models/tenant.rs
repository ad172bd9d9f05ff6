//! Tenant domain model.
//!
//! A tenant is an organization. Every user and every downstream
//! resource belongs to exactly one tenant; the subdomain is the
//! tenant's globally unique handle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription tier of a tenant. New tenants always start on
/// [`SubscriptionTier::Trial`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    Trial,
    Standard,
    Pro,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Human-readable organization name.
    pub name: String,
    /// Globally unique handle: lowercase `[a-z0-9-]`, 3–20 chars.
    pub subdomain: String,
    pub tier: SubscriptionTier,
    /// End of the trial window. Set only while `tier` is `Trial`.
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub subdomain: String,
    pub tier: SubscriptionTier,
    pub trial_ends_at: Option<DateTime<Utc>>,
}

pub const SUBDOMAIN_MIN_LEN: usize = 3;
pub const SUBDOMAIN_MAX_LEN: usize = 20;

/// Whether `s` is a well-formed subdomain: 3–20 characters, lowercase
/// ASCII letters, digits, or hyphens.
pub fn valid_subdomain(s: &str) -> bool {
    (SUBDOMAIN_MIN_LEN..=SUBDOMAIN_MAX_LEN).contains(&s.len())
        && s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_subdomains() {
        assert!(valid_subdomain("abc"));
        assert!(valid_subdomain("grace-church-2"));
        assert!(valid_subdomain("a2345678901234567890"));
    }

    #[test]
    fn rejects_malformed_subdomains() {
        assert!(!valid_subdomain("ab"));
        assert!(!valid_subdomain("a23456789012345678901"));
        assert!(!valid_subdomain("Uppercase"));
        assert!(!valid_subdomain("with space"));
        assert!(!valid_subdomain("dots.are.out"));
        assert!(!valid_subdomain(""));
    }
}
