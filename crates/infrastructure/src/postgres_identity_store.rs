//! PostgreSQL-backed identity store.
//!
//! Implements the identity store, tenant directory, authorization and
//! audit ports over one pool. User names are unique through the
//! `normalized_user_name` column.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use steward_application::{
    AuditEvent, AuditRepository, AuthorizationRepository, IdentityResult, IdentityStore,
    NewUserAccount, PageRequest, PasswordHasher, TenantDirectory, TenantSummary, UserAccount,
    UserFilter,
};
use steward_core::{AppError, AppResult, TenantId};
use steward_domain::{Claim, Permission, UserId};

mod accounts;
mod audit;
mod credentials;
mod listing;
mod membership;
mod permissions;
mod tenants;

/// PostgreSQL implementation of the identity ports.
#[derive(Clone)]
pub struct PostgresIdentityStore {
    pool: PgPool,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl PostgresIdentityStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool, password_hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            pool,
            password_hasher,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserAccountRow {
    id: uuid::Uuid,
    user_name: String,
    display_name: Option<String>,
    email: Option<String>,
    phone_number: Option<String>,
    profile_picture_url: Option<String>,
    tenant_id: Option<uuid::Uuid>,
    tenant_name: Option<String>,
    superior_id: Option<uuid::Uuid>,
    provider: String,
    is_active: bool,
    roles: Vec<String>,
}

impl From<UserAccountRow> for UserAccount {
    fn from(row: UserAccountRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            user_name: row.user_name,
            display_name: row.display_name,
            email: row.email,
            phone_number: row.phone_number,
            profile_picture_url: row.profile_picture_url,
            tenant_id: row.tenant_id.map(TenantId::from_uuid),
            tenant_name: row.tenant_name,
            superior_id: row.superior_id.map(UserId::from_uuid),
            provider: row.provider,
            is_active: row.is_active,
            roles: row.roles,
        }
    }
}

/// Columns selected for every account query, aliased as `u`.
const ACCOUNT_COLUMNS: &str = r#"
    u.id,
    u.user_name,
    u.display_name,
    u.email,
    u.phone_number,
    u.profile_picture_url,
    u.tenant_id,
    u.tenant_name,
    u.superior_id,
    u.provider,
    u.is_active,
    COALESCE(
        ARRAY(SELECT ur.role_name FROM user_roles ur WHERE ur.user_id = u.id ORDER BY ur.role_name),
        ARRAY[]::TEXT[]
    ) AS roles
"#;

fn internal(action: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |error| AppError::Internal(format!("failed to {action}: {error}"))
}

#[async_trait]
impl IdentityStore for PostgresIdentityStore {
    async fn create_user(
        &self,
        account: NewUserAccount,
        password: Option<&str>,
    ) -> AppResult<IdentityResult<UserId>> {
        self.create_user_impl(account, password).await
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        self.find_by_id_impl(user_id).await
    }

    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Option<UserAccount>> {
        self.find_by_user_name_impl(user_name).await
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
        self.query_users_impl(filter, Some(page)).await
    }

    async fn count_users(&self, filter: &UserFilter) -> AppResult<u64> {
        self.count_users_impl(filter).await
    }

    async fn list_users(&self, filter: &UserFilter) -> AppResult<Vec<UserAccount>> {
        self.query_users_impl(filter, None).await
    }

    async fn list_role_names(&self) -> AppResult<Vec<String>> {
        self.list_role_names_impl().await
    }

    async fn get_roles(&self, user_id: UserId) -> AppResult<Vec<String>> {
        self.get_roles_impl(user_id).await
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
        self.get_claims_impl(user_id).await
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
impl AuthorizationRepository for PostgresIdentityStore {
    async fn list_permissions_for_subject(&self, subject: &str) -> AppResult<Vec<Permission>> {
        self.list_permissions_for_subject_impl(subject).await
    }
}

#[async_trait]
impl TenantDirectory for PostgresIdentityStore {
    async fn list_tenants(&self) -> AppResult<Vec<TenantSummary>> {
        self.list_tenants_impl().await
    }

    async fn ensure_tenant(&self, name: &str) -> AppResult<TenantSummary> {
        self.ensure_tenant_impl(name).await
    }
}

#[async_trait]
impl AuditRepository for PostgresIdentityStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.append_event_impl(event).await
    }
}
