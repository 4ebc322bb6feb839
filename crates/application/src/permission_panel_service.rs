//! Per-user permission claim panel.
//!
//! The panel joins the static permission catalog with the claims attached
//! directly to one account. Claim lists are read through [`ClaimCache`] and
//! the entry is removed after every claim write.

use std::sync::Arc;

use steward_core::{AppError, AppResult, UserIdentity};
use steward_domain::{Claim, PERMISSION_CATALOG, PERMISSION_CLAIM_TYPE, Permission, UserId};

use crate::{
    AuditRepository, AuthorizationService, ClaimCache, DEFAULT_CLAIM_CACHE_TTL_SECONDS,
    IdentityStore, UserAccount, claims_cache_key,
};

mod toggle;


/// One catalog entry as shown by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionDescriptor {
    /// Catalog group name.
    pub group: &'static str,
    /// Catalog group description.
    pub description: &'static str,
    /// Claim type granted by the row.
    pub claim_type: &'static str,
    /// Permission whose value is the claim value.
    pub permission: Permission,
}

impl PermissionDescriptor {
    /// Enumerates every catalog permission, grouped, in catalog order.
    pub fn catalog() -> impl Iterator<Item = Self> {
        PERMISSION_CATALOG.iter().flat_map(|group| {
            group.permissions.iter().map(move |permission| Self {
                group: group.name,
                description: group.description,
                claim_type: PERMISSION_CLAIM_TYPE,
                permission: *permission,
            })
        })
    }
}

/// Catalog entry joined with the account's claim set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionAssignment {
    /// Catalog entry.
    pub descriptor: PermissionDescriptor,
    /// Whether the account holds the claim.
    pub assigned: bool,
}

/// Panel content for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionPanel {
    /// Account the panel was opened for.
    pub user_id: UserId,
    /// Label of the account.
    pub user_label: String,
    /// One row per catalog permission.
    pub assignments: Vec<PermissionAssignment>,
}

/// Submitted row of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionToggle {
    /// Permission of the row.
    pub permission: Permission,
    /// Row state: the displayed state for a single toggle, the desired state
    /// for a bulk toggle.
    pub assigned: bool,
}

/// Result of a bulk toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkToggleOutcome {
    /// Claims added.
    pub granted: usize,
    /// Claims removed.
    pub revoked: usize,
    /// Rows already in the requested state.
    pub unchanged: usize,
}

/// Application service behind the permission panel.
#[derive(Clone)]
pub struct PermissionPanelService {
    identity_store: Arc<dyn IdentityStore>,
    claim_cache: Arc<dyn ClaimCache>,
    authorization_service: AuthorizationService,
    audit_repository: Arc<dyn AuditRepository>,
    claim_cache_ttl_seconds: u32,
}

impl PermissionPanelService {
    /// Creates a panel service caching claim lists for the default lifetime.
    #[must_use]
    pub fn new(
        identity_store: Arc<dyn IdentityStore>,
        claim_cache: Arc<dyn ClaimCache>,
        authorization_service: AuthorizationService,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            identity_store,
            claim_cache,
            authorization_service,
            audit_repository,
            claim_cache_ttl_seconds: DEFAULT_CLAIM_CACHE_TTL_SECONDS,
        }
    }

    /// Overrides the claim cache lifetime. Zero disables caching.
    #[must_use]
    pub fn with_claim_cache_ttl(mut self, ttl_seconds: u32) -> Self {
        self.claim_cache_ttl_seconds = ttl_seconds;
        self
    }

    /// Builds the panel for `user_id`.
    pub async fn open_panel(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
    ) -> AppResult<PermissionPanel> {
        self.authorization_service
            .require_permission(actor, Permission::UsersManagePermissions)
            .await?;

        let account = self.load_user(user_id).await?;
        let claims = self.cached_claims(user_id).await?;

        let assignments = PermissionDescriptor::catalog()
            .map(|descriptor| PermissionAssignment {
                descriptor,
                assigned: holds(&claims, descriptor.permission),
            })
            .collect();

        Ok(PermissionPanel {
            user_id,
            user_label: account.label().to_owned(),
            assignments,
        })
    }

    /// Returns the claims of `user_id`, filling the cache on a miss.
    ///
    /// The fill is not ordered against concurrent toggles: a read that
    /// started before a toggle removed the entry can store the older claim
    /// list afterwards, and it is served until the entry expires.
    pub async fn cached_claims(&self, user_id: UserId) -> AppResult<Vec<Claim>> {
        let key = claims_cache_key(user_id);

        if self.claim_cache_ttl_seconds > 0
            && let Some(claims) = self.claim_cache.get_claims(&key).await?
        {
            return Ok(claims);
        }

        let claims = self.identity_store.get_claims(user_id).await?;
        if self.claim_cache_ttl_seconds > 0 {
            self.claim_cache
                .set_claims(&key, claims.clone(), self.claim_cache_ttl_seconds)
                .await?;
        }

        Ok(claims)
    }

    async fn load_user(&self, user_id: UserId) -> AppResult<UserAccount> {
        self.identity_store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("the application user [{user_id}] was not found"))
            })
    }
}

fn holds(claims: &[Claim], permission: Permission) -> bool {
    claims.iter().any(|claim| {
        claim.claim_type() == PERMISSION_CLAIM_TYPE && claim.value() == permission.as_str()
    })
}
