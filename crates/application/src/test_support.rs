//! In-crate fakes shared by service tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use steward_core::{AppError, AppResult, TenantId, UserIdentity};
use steward_domain::{Claim, DEFAULT_PROVIDER, Permission, UserId};

use crate::{
    AuditEvent, AuditRepository, AuthorizationRepository, AuthorizationService, ClaimCache,
    IdentityResult, IdentityStore, ImportedSheet, NewUserAccount, PageRequest,
    PermissionPanelService, SpreadsheetCodec, TenantDirectory, TenantSummary, UserAccount,
    UserAdminService, UserDirectory, UserDirectoryEntry, UserFilter,
};

#[derive(Default)]
pub(crate) struct FakeIdentityStore {
    pub(crate) accounts: Mutex<Vec<UserAccount>>,
    pub(crate) claims: Mutex<HashMap<UserId, Vec<Claim>>>,
    pub(crate) passwords: Mutex<HashMap<UserId, String>>,
    pub(crate) reset_tokens: Mutex<HashMap<UserId, String>>,
    pub(crate) role_writes: Mutex<Vec<String>>,
    pub(crate) claim_writes: AtomicUsize,
    pub(crate) claim_reads: AtomicUsize,
    pub(crate) failing_deletes: Mutex<Vec<UserId>>,
    pub(crate) failing_updates: Mutex<Vec<UserId>>,
    pub(crate) failing_claim: Mutex<Option<String>>,
}

pub(crate) const ROLE_NAMES: [&str; 3] = ["Admin", "Basic", "Manager"];

impl FakeIdentityStore {
    pub(crate) async fn seed(&self, user_name: &str, roles: &[&str]) -> UserId {
        let id = UserId::new();
        self.accounts.lock().await.push(UserAccount {
            id,
            user_name: user_name.to_owned(),
            display_name: None,
            email: Some(format!("{user_name}@example.com")),
            phone_number: None,
            profile_picture_url: None,
            tenant_id: None,
            tenant_name: None,
            superior_id: None,
            provider: DEFAULT_PROVIDER.to_owned(),
            is_active: true,
            roles: roles.iter().map(|role| (*role).to_owned()).collect(),
        });
        id
    }

    pub(crate) async fn account(&self, user_id: UserId) -> Option<UserAccount> {
        self.accounts
            .lock()
            .await
            .iter()
            .find(|account| account.id == user_id)
            .cloned()
    }

    pub(crate) async fn claims_of(&self, user_id: UserId) -> Vec<Claim> {
        self.claims
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn with_account<T>(
        &self,
        user_id: UserId,
        apply: impl FnOnce(&mut UserAccount) -> T,
    ) -> Option<T> {
        self.accounts
            .lock()
            .await
            .iter_mut()
            .find(|account| account.id == user_id)
            .map(apply)
    }
}

#[async_trait]
impl IdentityStore for FakeIdentityStore {
    async fn create_user(
        &self,
        account: NewUserAccount,
        password: Option<&str>,
    ) -> AppResult<IdentityResult<UserId>> {
        let mut accounts = self.accounts.lock().await;
        if accounts
            .iter()
            .any(|existing| existing.user_name.eq_ignore_ascii_case(&account.user_name))
        {
            return Ok(IdentityResult::failed(format!(
                "user name '{}' is already taken",
                account.user_name
            )));
        }

        let id = UserId::new();
        accounts.push(UserAccount {
            id,
            user_name: account.user_name,
            display_name: account.display_name,
            email: account.email,
            phone_number: account.phone_number,
            profile_picture_url: account.profile_picture_url,
            tenant_id: account.tenant_id,
            tenant_name: account.tenant_name,
            superior_id: account.superior_id,
            provider: account.provider,
            is_active: account.is_active,
            roles: Vec::new(),
        });
        if let Some(password) = password {
            self.passwords.lock().await.insert(id, password.to_owned());
        }

        Ok(IdentityResult::Succeeded(id))
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.account(user_id).await)
    }

    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Option<UserAccount>> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .find(|account| account.user_name.eq_ignore_ascii_case(user_name))
            .cloned())
    }

    async fn update_user(&self, account: &UserAccount) -> AppResult<IdentityResult> {
        if self.failing_updates.lock().await.contains(&account.id) {
            return Ok(IdentityResult::failed("concurrency failure"));
        }

        let updated = self
            .with_account(account.id, |stored| {
                let roles = std::mem::take(&mut stored.roles);
                *stored = account.clone();
                stored.roles = roles;
            })
            .await;

        Ok(match updated {
            Some(()) => IdentityResult::Succeeded(()),
            None => IdentityResult::failed("user does not exist"),
        })
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<IdentityResult> {
        if self.failing_deletes.lock().await.contains(&user_id) {
            return Err(AppError::Internal("delete failed".to_owned()));
        }

        self.accounts
            .lock()
            .await
            .retain(|account| account.id != user_id);
        self.claims.lock().await.remove(&user_id);
        Ok(IdentityResult::Succeeded(()))
    }

    async fn query_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> AppResult<Vec<UserAccount>> {
        let mut matching = self.list_users(filter).await?;
        matching.sort_by(|left, right| page.sort.compare(left, right));
        Ok(matching
            .into_iter()
            .skip(page.offset())
            .take(page.page_size)
            .collect())
    }

    async fn count_users(&self, filter: &UserFilter) -> AppResult<u64> {
        Ok(self.list_users(filter).await?.len() as u64)
    }

    async fn list_users(&self, filter: &UserFilter) -> AppResult<Vec<UserAccount>> {
        Ok(self
            .accounts
            .lock()
            .await
            .iter()
            .filter(|account| filter.matches(account))
            .cloned()
            .collect())
    }

    async fn list_role_names(&self) -> AppResult<Vec<String>> {
        Ok(ROLE_NAMES.iter().map(|role| (*role).to_owned()).collect())
    }

    async fn get_roles(&self, user_id: UserId) -> AppResult<Vec<String>> {
        Ok(self
            .account(user_id)
            .await
            .map(|account| account.roles)
            .unwrap_or_default())
    }

    async fn add_to_roles(&self, user_id: UserId, roles: &[String]) -> AppResult<IdentityResult> {
        if let Some(unknown) = roles
            .iter()
            .find(|role| !ROLE_NAMES.contains(&role.as_str()))
        {
            return Ok(IdentityResult::failed(format!("role '{unknown}' does not exist")));
        }

        self.role_writes
            .lock()
            .await
            .extend(roles.iter().map(|role| format!("+{role}")));
        self.with_account(user_id, |account| {
            for role in roles {
                if !account.roles.contains(role) {
                    account.roles.push(role.clone());
                }
            }
            account.roles.sort();
        })
        .await;
        Ok(IdentityResult::Succeeded(()))
    }

    async fn remove_from_roles(
        &self,
        user_id: UserId,
        roles: &[String],
    ) -> AppResult<IdentityResult> {
        self.role_writes
            .lock()
            .await
            .extend(roles.iter().map(|role| format!("-{role}")));
        self.with_account(user_id, |account| {
            account.roles.retain(|role| !roles.contains(role));
        })
        .await;
        Ok(IdentityResult::Succeeded(()))
    }

    async fn get_claims(&self, user_id: UserId) -> AppResult<Vec<Claim>> {
        self.claim_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.claims_of(user_id).await)
    }

    async fn add_claim(&self, user_id: UserId, claim: &Claim) -> AppResult<IdentityResult> {
        if self.failing_claim.lock().await.as_deref() == Some(claim.value()) {
            return Ok(IdentityResult::failed("claim store rejected the write"));
        }

        self.claim_writes.fetch_add(1, Ordering::SeqCst);
        let mut claims = self.claims.lock().await;
        let entry = claims.entry(user_id).or_default();
        if entry.contains(claim) {
            return Ok(IdentityResult::failed("claim already exists"));
        }
        entry.push(claim.clone());
        Ok(IdentityResult::Succeeded(()))
    }

    async fn remove_claim(&self, user_id: UserId, claim: &Claim) -> AppResult<IdentityResult> {
        if self.failing_claim.lock().await.as_deref() == Some(claim.value()) {
            return Ok(IdentityResult::failed("claim store rejected the write"));
        }

        self.claim_writes.fetch_add(1, Ordering::SeqCst);
        if let Some(entry) = self.claims.lock().await.get_mut(&user_id) {
            entry.retain(|stored| stored != claim);
        }
        Ok(IdentityResult::Succeeded(()))
    }

    async fn generate_password_reset_token(&self, user_id: UserId) -> AppResult<String> {
        let token = format!("token-{user_id}");
        self.reset_tokens
            .lock()
            .await
            .insert(user_id, token.clone());
        Ok(token)
    }

    async fn reset_password(
        &self,
        user_id: UserId,
        token: &str,
        new_password: &str,
    ) -> AppResult<IdentityResult> {
        let issued = self.reset_tokens.lock().await.remove(&user_id);
        if issued.as_deref() != Some(token) {
            return Ok(IdentityResult::failed("invalid token"));
        }

        self.passwords
            .lock()
            .await
            .insert(user_id, new_password.to_owned());
        Ok(IdentityResult::Succeeded(()))
    }

    async fn check_password(&self, user_id: UserId, password: &str) -> AppResult<bool> {
        Ok(self.passwords.lock().await.get(&user_id).map(String::as_str) == Some(password))
    }
}

#[derive(Default)]
pub(crate) struct FakeTenantDirectory {
    pub(crate) tenants: Mutex<Vec<TenantSummary>>,
}

impl FakeTenantDirectory {
    pub(crate) async fn add(&self, name: &str) -> TenantSummary {
        let tenant = TenantSummary {
            id: TenantId::new(),
            name: name.to_owned(),
        };
        self.tenants.lock().await.push(tenant.clone());
        tenant
    }
}

#[async_trait]
impl TenantDirectory for FakeTenantDirectory {
    async fn list_tenants(&self) -> AppResult<Vec<TenantSummary>> {
        Ok(self.tenants.lock().await.clone())
    }

    async fn ensure_tenant(&self, name: &str) -> AppResult<TenantSummary> {
        let existing = self
            .tenants
            .lock()
            .await
            .iter()
            .find(|tenant| tenant.name == name)
            .cloned();
        match existing {
            Some(tenant) => Ok(tenant),
            None => Ok(self.add(name).await),
        }
    }
}

pub(crate) struct FakeAuthorizationRepository {
    pub(crate) grants: HashMap<String, Vec<Permission>>,
}

#[async_trait]
impl AuthorizationRepository for FakeAuthorizationRepository {
    async fn list_permissions_for_subject(&self, subject: &str) -> AppResult<Vec<Permission>> {
        Ok(self.grants.get(subject).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub(crate) struct FakeClaimCache {
    pub(crate) entries: Mutex<HashMap<String, Vec<Claim>>>,
    pub(crate) removals: Mutex<Vec<String>>,
}

#[async_trait]
impl ClaimCache for FakeClaimCache {
    async fn get_claims(&self, key: &str) -> AppResult<Option<Vec<Claim>>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set_claims(&self, key: &str, claims: Vec<Claim>, ttl_seconds: u32) -> AppResult<()> {
        if ttl_seconds > 0 {
            self.entries.lock().await.insert(key.to_owned(), claims);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.lock().await.remove(key);
        self.removals.lock().await.push(key.to_owned());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeAuditRepository {
    pub(crate) events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeUserDirectory {
    pub(crate) refreshes: AtomicUsize,
}

#[async_trait]
impl UserDirectory for FakeUserDirectory {
    async fn refresh(&self) -> AppResult<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn entries(&self) -> AppResult<Vec<UserDirectoryEntry>> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
pub(crate) struct FakeSpreadsheetCodec {
    pub(crate) exported: Mutex<Vec<(Vec<String>, Vec<Vec<String>>)>>,
    pub(crate) sheet: Mutex<ImportedSheet>,
}

#[async_trait]
impl SpreadsheetCodec for FakeSpreadsheetCodec {
    async fn export(
        &self,
        headers: &[&str],
        rows: Vec<Vec<String>>,
        _sheet_name: &str,
    ) -> AppResult<Vec<u8>> {
        let encoded = rows.len().to_string().into_bytes();
        self.exported.lock().await.push((
            headers.iter().map(|header| (*header).to_owned()).collect(),
            rows,
        ));
        Ok(encoded)
    }

    async fn import(&self, _content: &[u8], _sheet_name: &str) -> AppResult<ImportedSheet> {
        Ok(self.sheet.lock().await.clone())
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }

    fn content_type(&self) -> &'static str {
        "text/csv"
    }
}

/// Wires both services over shared fakes with one privileged principal.
pub(crate) struct Fixture {
    pub(crate) store: Arc<FakeIdentityStore>,
    pub(crate) tenants: Arc<FakeTenantDirectory>,
    pub(crate) cache: Arc<FakeClaimCache>,
    pub(crate) audit: Arc<FakeAuditRepository>,
    pub(crate) directory: Arc<FakeUserDirectory>,
    pub(crate) codec: Arc<FakeSpreadsheetCodec>,
    pub(crate) actor: UserIdentity,
    pub(crate) actor_id: UserId,
    pub(crate) users: UserAdminService,
    pub(crate) panel: PermissionPanelService,
}

impl Fixture {
    /// Grants the principal every permission.
    pub(crate) async fn new() -> Self {
        Self::with_permissions(Permission::all().collect()).await
    }

    pub(crate) async fn with_permissions(permissions: Vec<Permission>) -> Self {
        let store = Arc::new(FakeIdentityStore::default());
        let actor_id = store.seed("admin", &["Admin"]).await;
        let actor = UserIdentity::new(actor_id.to_string(), "admin", None, None);

        let authorization_service = AuthorizationService::new(Arc::new(
            FakeAuthorizationRepository {
                grants: HashMap::from([(actor_id.to_string(), permissions)]),
            },
        ));

        let tenants = Arc::new(FakeTenantDirectory::default());
        let cache = Arc::new(FakeClaimCache::default());
        let audit = Arc::new(FakeAuditRepository::default());
        let directory = Arc::new(FakeUserDirectory::default());
        let codec = Arc::new(FakeSpreadsheetCodec::default());

        let users = UserAdminService::new(
            store.clone(),
            tenants.clone(),
            authorization_service.clone(),
            codec.clone(),
            directory.clone(),
            audit.clone(),
        );
        let panel = PermissionPanelService::new(
            store.clone(),
            cache.clone(),
            authorization_service,
            audit.clone(),
        );

        Self {
            store,
            tenants,
            cache,
            audit,
            directory,
            codec,
            actor,
            actor_id,
            users,
            panel,
        }
    }
}

impl FakeIdentityStore {
    pub(crate) async fn find_by_user_name_for_test(&self, user_name: &str) -> Option<UserAccount> {
        self.accounts
            .lock()
            .await
            .iter()
            .find(|account| account.user_name == user_name)
            .cloned()
    }
}
