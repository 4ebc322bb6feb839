//! In-memory identity store used for local runs and tests.
//!
//! Holds accounts, roles, claims, tenants and reset tokens behind one lock so
//! every write sees a consistent snapshot. System roles are seeded on
//! construction: `Admin` with every catalog permission, `Basic` with none.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use steward_application::{
    AuthorizationRepository, IdentityResult, IdentityStore, NewUserAccount, PageRequest,
    PasswordHasher, TenantDirectory, TenantSummary, UserAccount, UserFilter,
};
use steward_core::{AppResult, TenantId};
use steward_domain::{ADMIN_ROLE_NAME, BASIC_ROLE_NAME, Claim, Permission, UserId};
use tokio::sync::RwLock;

mod accounts;
mod credentials;
mod membership;


#[derive(Debug, Clone)]
struct StoredAccount {
    account: UserAccount,
    claims: Vec<Claim>,
    password_hash: Option<String>,
}

/// Role with the claims every member inherits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Unique role name.
    pub name: String,
    /// Claims granted to members.
    pub claims: Vec<Claim>,
}

impl RoleDefinition {
    /// Returns the seeded system roles.
    #[must_use]
    pub fn system_roles() -> Vec<Self> {
        vec![
            Self {
                name: ADMIN_ROLE_NAME.to_owned(),
                claims: Permission::all().map(Claim::permission).collect(),
            },
            Self {
                name: BASIC_ROLE_NAME.to_owned(),
                claims: Vec::new(),
            },
        ]
    }
}

#[derive(Debug, Default)]
struct IdentityState {
    accounts: HashMap<UserId, StoredAccount>,
    roles: BTreeMap<String, RoleDefinition>,
    tenants: Vec<TenantSummary>,
    reset_tokens: HashMap<UserId, String>,
}

impl IdentityState {
    fn user_name_taken(&self, user_name: &str, except: Option<UserId>) -> bool {
        self.accounts.values().any(|stored| {
            Some(stored.account.id) != except
                && stored.account.user_name.eq_ignore_ascii_case(user_name)
        })
    }
}

/// In-memory implementation of the identity store, tenant directory and
/// authorization repository ports.
pub struct InMemoryIdentityStore {
    state: RwLock<IdentityState>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl InMemoryIdentityStore {
    /// Creates a store holding only the system roles.
    #[must_use]
    pub fn new(password_hasher: Arc<dyn PasswordHasher>) -> Self {
        let roles = RoleDefinition::system_roles()
            .into_iter()
            .map(|role| (role.name.clone(), role))
            .collect();

        Self {
            state: RwLock::new(IdentityState {
                roles,
                ..IdentityState::default()
            }),
            password_hasher,
        }
    }

    /// Adds or replaces a role definition.
    pub async fn save_role(&self, role: RoleDefinition) {
        self.state
            .write()
            .await
            .roles
            .insert(role.name.clone(), role);
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn create_user(
        &self,
        account: NewUserAccount,
        password: Option<&str>,
    ) -> AppResult<IdentityResult<UserId>> {
        self.create_user_impl(account, password).await
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self
            .state
            .read()
            .await
            .accounts
            .get(&user_id)
            .map(|stored| stored.account.clone()))
    }

    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Option<UserAccount>> {
        Ok(self
            .state
            .read()
            .await
            .accounts
            .values()
            .find(|stored| stored.account.user_name.eq_ignore_ascii_case(user_name))
            .map(|stored| stored.account.clone()))
    }

    async fn update_user(&self, account: &UserAccount) -> AppResult<IdentityResult> {
        self.update_user_impl(account).await
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<IdentityResult> {
        self.delete_user_impl(user_id).await
    }

    async fn query_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> AppResult<Vec<UserAccount>> {
        self.query_users_impl(filter, page).await
    }

    async fn count_users(&self, filter: &UserFilter) -> AppResult<u64> {
        let state = self.state.read().await;
        let count = state
            .accounts
            .values()
            .filter(|stored| filter.matches(&stored.account))
            .count();

        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn list_users(&self, filter: &UserFilter) -> AppResult<Vec<UserAccount>> {
        self.query_users_impl(
            filter,
            PageRequest {
                page: 0,
                page_size: usize::MAX,
                sort: steward_application::UserSort::default(),
            },
        )
        .await
    }

    async fn list_role_names(&self) -> AppResult<Vec<String>> {
        Ok(self.state.read().await.roles.keys().cloned().collect())
    }

    async fn get_roles(&self, user_id: UserId) -> AppResult<Vec<String>> {
        Ok(self
            .state
            .read()
            .await
            .accounts
            .get(&user_id)
            .map(|stored| stored.account.roles.clone())
            .unwrap_or_default())
    }

    async fn add_to_roles(&self, user_id: UserId, roles: &[String]) -> AppResult<IdentityResult> {
        self.add_to_roles_impl(user_id, roles).await
    }

    async fn remove_from_roles(
        &self,
        user_id: UserId,
        roles: &[String],
    ) -> AppResult<IdentityResult> {
        self.remove_from_roles_impl(user_id, roles).await
    }

    async fn get_claims(&self, user_id: UserId) -> AppResult<Vec<Claim>> {
        Ok(self
            .state
            .read()
            .await
            .accounts
            .get(&user_id)
            .map(|stored| stored.claims.clone())
            .unwrap_or_default())
    }

    async fn add_claim(&self, user_id: UserId, claim: &Claim) -> AppResult<IdentityResult> {
        self.add_claim_impl(user_id, claim).await
    }

    async fn remove_claim(&self, user_id: UserId, claim: &Claim) -> AppResult<IdentityResult> {
        self.remove_claim_impl(user_id, claim).await
    }

    async fn generate_password_reset_token(&self, user_id: UserId) -> AppResult<String> {
        self.generate_password_reset_token_impl(user_id).await
    }

    async fn reset_password(
        &self,
        user_id: UserId,
        token: &str,
        new_password: &str,
    ) -> AppResult<IdentityResult> {
        self.reset_password_impl(user_id, token, new_password).await
    }

    async fn check_password(&self, user_id: UserId, password: &str) -> AppResult<bool> {
        self.check_password_impl(user_id, password).await
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryIdentityStore {
    async fn list_permissions_for_subject(&self, subject: &str) -> AppResult<Vec<Permission>> {
        let Ok(user_id) = UserId::parse(subject) else {
            return Ok(Vec::new());
        };

        let state = self.state.read().await;
        let Some(stored) = state.accounts.get(&user_id) else {
            return Ok(Vec::new());
        };

        let role_claims = stored
            .account
            .roles
            .iter()
            .filter_map(|role| state.roles.get(role))
            .flat_map(|role| role.claims.iter());

        let mut permissions: Vec<Permission> = stored
            .claims
            .iter()
            .chain(role_claims)
            .filter_map(Claim::as_permission)
            .collect();
        permissions.sort();
        permissions.dedup();

        Ok(permissions)
    }
}

#[async_trait]
impl TenantDirectory for InMemoryIdentityStore {
    async fn list_tenants(&self) -> AppResult<Vec<TenantSummary>> {
        Ok(self.state.read().await.tenants.clone())
    }

    async fn ensure_tenant(&self, name: &str) -> AppResult<TenantSummary> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.tenants.iter().find(|tenant| tenant.name == name) {
            return Ok(existing.clone());
        }

        let tenant = TenantSummary {
            id: TenantId::new(),
            name: name.to_owned(),
        };
        state.tenants.push(tenant.clone());
        Ok(tenant)
    }
}
