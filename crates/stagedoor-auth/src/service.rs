//! Identity service — registration, login, self-lookup, and federated
//! onboarding.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use stagedoor_core::error::{StagedoorError, StagedoorResult, UniqueField};
use stagedoor_core::models::tenant::{
    CreateTenant, SUBDOMAIN_MAX_LEN, SUBDOMAIN_MIN_LEN, SubscriptionTier, Tenant, valid_subdomain,
};
use stagedoor_core::models::user::{CreateUser, IdentityProvider, Role, User, UserWithTenant};
use stagedoor_core::repository::IdentityStore;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::password;
use crate::token;

/// Trial window granted to every new tenant.
const TRIAL_DAYS: i64 = 30;

/// Highest numeric suffix tried when a derived subdomain is taken.
const MAX_SUBDOMAIN_SUFFIX: u32 = 50;

/// Input for registration.
///
/// Tenant name and subdomain come from the caller; the federated path
/// derives them from the external profile before delegating here.
#[derive(Debug)]
pub struct RegisterInput {
    pub email: String,
    pub name: String,
    /// `None` for a federated-only registration.
    pub password: Option<String>,
    pub tenant_name: String,
    pub tenant_subdomain: String,
    pub google_id: Option<String>,
    pub microsoft_id: Option<String>,
}

/// Identity asserted by an external provider after its own OAuth
/// exchange (the protocol mechanics live outside this crate).
#[derive(Debug, Clone)]
pub struct FederatedProfile {
    /// Stable user id in the provider's namespace.
    pub provider_user_id: String,
    pub email: String,
    pub display_name: String,
}

/// Tenant fields safe for register/login responses.
#[derive(Debug, Clone, Serialize)]
pub struct TenantSummary {
    pub id: Uuid,
    pub name: String,
    pub subdomain: String,
    pub tier: SubscriptionTier,
}

/// User fields safe for register/login responses. The password hash
/// never appears in any view.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub tenant: TenantSummary,
}

/// Result of a successful registration, login, or federated sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: UserSummary,
    pub token: String,
    /// Declared token lifetime in seconds.
    pub expires_in_secs: u64,
}

/// Tenant view for self-lookup; includes the trial window.
#[derive(Debug, Clone, Serialize)]
pub struct TenantProfile {
    pub id: Uuid,
    pub name: String,
    pub subdomain: String,
    pub tier: SubscriptionTier,
    pub trial_ends_at: Option<DateTime<Utc>>,
}

/// User view for self-lookup.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub tenant: TenantProfile,
}

fn session_view(user: User, tenant: Tenant, token: String, config: &AuthConfig) -> AuthSession {
    AuthSession {
        user: UserSummary {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            tenant: TenantSummary {
                id: tenant.id,
                name: tenant.name,
                subdomain: tenant.subdomain,
                tier: tenant.tier,
            },
        },
        token,
        expires_in_secs: config.token_lifetime_secs,
    }
}

fn profile_view(found: UserWithTenant) -> UserProfile {
    UserProfile {
        id: found.user.id,
        email: found.user.email,
        name: found.user.name,
        role: found.user.role,
        tenant: TenantProfile {
            id: found.tenant.id,
            name: found.tenant.name,
            subdomain: found.tenant.subdomain,
            tier: found.tenant.tier,
            trial_ends_at: found.tenant.trial_ends_at,
        },
    }
}

/// Candidate subdomain from an email local part: lowercased,
/// non-alphanumerics stripped, clamped to the subdomain format.
fn derive_subdomain_base(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let mut base: String = local
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if base.len() < SUBDOMAIN_MIN_LEN {
        base.push_str("team");
    }
    base.truncate(SUBDOMAIN_MAX_LEN);
    base
}

/// Orchestrates registration, login, self-lookup, and federated
/// onboarding.
///
/// Store access goes through the [`IdentityStore`] trait, keeping
/// this crate independent of the persistence implementation. Holds no
/// mutable state; every call is independent.
pub struct IdentityService<S: IdentityStore> {
    store: S,
    config: AuthConfig,
}

impl<S: IdentityStore> IdentityService<S> {
    pub fn new(store: S, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Register a new tenant together with its first (admin) user.
    pub async fn register(&self, input: RegisterInput) -> StagedoorResult<AuthSession> {
        // 1. Email must not already resolve to a user.
        if self.store.find_user_by_email(&input.email).await?.is_some() {
            return Err(StagedoorError::Conflict {
                field: UniqueField::Email,
            });
        }

        // 2. Subdomain must be unclaimed.
        if self
            .store
            .find_tenant_by_subdomain(&input.tenant_subdomain)
            .await?
            .is_some()
        {
            return Err(StagedoorError::Conflict {
                field: UniqueField::Subdomain,
            });
        }

        // 3. Hash the password when one is supplied. Federated-only
        //    registrations carry none.
        let password_hash = match input.password.as_deref() {
            Some(password) => Some(password::hash_password(
                password,
                self.config.pepper.as_deref(),
            )?),
            None => None,
        };

        // 4. Atomically create tenant and first user. Racers past the
        //    pre-checks are settled by the store's unique indexes:
        //    exactly one winner, losers get Conflict.
        let (tenant, user) = self
            .store
            .create_tenant_with_user(
                CreateTenant {
                    name: input.tenant_name,
                    subdomain: input.tenant_subdomain,
                    tier: SubscriptionTier::Trial,
                    trial_ends_at: Some(Utc::now() + Duration::days(TRIAL_DAYS)),
                },
                CreateUser {
                    email: input.email,
                    name: input.name,
                    password_hash,
                    google_id: input.google_id,
                    microsoft_id: input.microsoft_id,
                    role: Role::Admin,
                },
            )
            .await?;

        // 5. Issue a token for the new user.
        let token = token::issue_token(user.id, &self.config)?;

        // 6. Return the session view.
        Ok(session_view(user, tenant, token, &self.config))
    }

    /// Authenticate by email + password and issue a token.
    pub async fn login(&self, email: &str, password: &str) -> StagedoorResult<AuthSession> {
        // 1. Look up the user. A miss fails exactly like a wrong
        //    password so registered emails cannot be probed.
        let found = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(StagedoorError::InvalidCredentials)?;

        // 2. Federated-only accounts carry no hash to verify against.
        let Some(hash) = found.user.password_hash.as_deref() else {
            return Err(StagedoorError::NoPasswordSet);
        };

        // 3. Verify the password.
        if !password::verify_password(password, hash, self.config.pepper.as_deref()) {
            return Err(StagedoorError::InvalidCredentials);
        }

        // 4. Issue a token.
        let token = token::issue_token(found.user.id, &self.config)?;

        Ok(session_view(found.user, found.tenant, token, &self.config))
    }

    /// Self-lookup for an authenticated user. The view includes the
    /// trial window, which register/login views omit.
    pub async fn current_user(&self, user_id: Uuid) -> StagedoorResult<UserProfile> {
        let found = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| StagedoorError::NotFound {
                entity: "user".into(),
                id: user_id.to_string(),
            })?;

        Ok(profile_view(found))
    }

    /// Sign in (or onboard) a user asserted by an external provider.
    pub async fn handle_federated_credential(
        &self,
        profile: FederatedProfile,
        provider: IdentityProvider,
    ) -> StagedoorResult<AuthSession> {
        // Known email: attach the provider id when the slot is free,
        // then sign the user in. An occupied slot is left untouched.
        if let Some(found) = self.store.find_user_by_email(&profile.email).await? {
            let found = if found.user.provider_id(provider).is_none() {
                self.store
                    .update_provider_link(found.user.id, provider, &profile.provider_user_id)
                    .await?
            } else {
                found
            };

            let token = token::issue_token(found.user.id, &self.config)?;
            return Ok(session_view(found.user, found.tenant, token, &self.config));
        }

        // First sign-in: derive a tenant from the profile and register
        // without a password.
        let tenant_subdomain = self.available_subdomain(&profile.email).await?;
        let tenant_name = format!("{}'s Organization", profile.display_name);
        let (google_id, microsoft_id) = match provider {
            IdentityProvider::Google => (Some(profile.provider_user_id), None),
            IdentityProvider::Microsoft => (None, Some(profile.provider_user_id)),
        };

        self.register(RegisterInput {
            email: profile.email,
            name: profile.display_name,
            password: None,
            tenant_name,
            tenant_subdomain,
            google_id,
            microsoft_id,
        })
        .await
    }

    /// Whether `subdomain` is well-formed and unclaimed.
    pub async fn subdomain_available(&self, subdomain: &str) -> StagedoorResult<bool> {
        if !valid_subdomain(subdomain) {
            return Err(StagedoorError::Validation {
                message: format!(
                    "Subdomain must be {SUBDOMAIN_MIN_LEN}-{SUBDOMAIN_MAX_LEN} characters: \
                     lowercase letters, digits, or hyphens"
                ),
            });
        }

        Ok(self
            .store
            .find_tenant_by_subdomain(subdomain)
            .await?
            .is_none())
    }

    /// Pick an unclaimed subdomain for a derived registration,
    /// suffixing `-2`, `-3`, ... when the base is taken.
    async fn available_subdomain(&self, email: &str) -> StagedoorResult<String> {
        let base = derive_subdomain_base(email);
        if self.store.find_tenant_by_subdomain(&base).await?.is_none() {
            return Ok(base);
        }

        for n in 2..=MAX_SUBDOMAIN_SUFFIX {
            let suffix = format!("-{n}");
            let mut candidate = base.clone();
            candidate.truncate(SUBDOMAIN_MAX_LEN - suffix.len());
            candidate.push_str(&suffix);
            if self
                .store
                .find_tenant_by_subdomain(&candidate)
                .await?
                .is_none()
            {
                return Ok(candidate);
            }
        }

        Err(StagedoorError::Conflict {
            field: UniqueField::Subdomain,
        })
    }
}
