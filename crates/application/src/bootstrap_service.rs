//! First-run seeding of a tenant and an administrator account.

use std::sync::Arc;

use steward_core::AppResult;
use steward_domain::{ADMIN_ROLE_NAME, DEFAULT_PROVIDER, EmailAddress, UserId, UserName, validate_password};
use tracing::info;

use crate::{IdentityStore, NewUserAccount, TenantDirectory, UserFilter};

/// Credentials of the administrator seeded into an empty store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    /// Tenant created for the administrator.
    pub tenant_name: String,
    /// Administrator login name.
    pub user_name: String,
    /// Administrator password.
    pub password: String,
    /// Optional administrator email.
    pub email: Option<String>,
}

/// Seeds an administrator when the identity store has no accounts.
#[derive(Clone)]
pub struct BootstrapService {
    identity_store: Arc<dyn IdentityStore>,
    tenant_directory: Arc<dyn TenantDirectory>,
}

impl BootstrapService {
    /// Creates a new bootstrap service.
    #[must_use]
    pub fn new(
        identity_store: Arc<dyn IdentityStore>,
        tenant_directory: Arc<dyn TenantDirectory>,
    ) -> Self {
        Self {
            identity_store,
            tenant_directory,
        }
    }

    /// Creates the tenant and the `Admin` account unless any account exists.
    ///
    /// Returns the id of the seeded account, or `None` when nothing was done.
    pub async fn seed_admin(&self, admin: &BootstrapAdmin) -> AppResult<Option<UserId>> {
        if self.identity_store.count_users(&UserFilter::default()).await? > 0 {
            return Ok(None);
        }

        let user_name = UserName::new(admin.user_name.as_str())?;
        validate_password(&admin.password)?;
        let email = admin
            .email
            .as_deref()
            .map(EmailAddress::new)
            .transpose()?
            .map(String::from);

        let tenant = self
            .tenant_directory
            .ensure_tenant(admin.tenant_name.trim())
            .await?;

        let user_id = self
            .identity_store
            .create_user(
                NewUserAccount {
                    user_name: user_name.into(),
                    display_name: Some("Administrator".to_owned()),
                    email,
                    phone_number: None,
                    profile_picture_url: None,
                    tenant_id: Some(tenant.id),
                    tenant_name: Some(tenant.name.clone()),
                    superior_id: None,
                    provider: DEFAULT_PROVIDER.to_owned(),
                    is_active: true,
                },
                Some(&admin.password),
            )
            .await?
            .into_app_result()?;

        self.identity_store
            .add_to_roles(user_id, &[ADMIN_ROLE_NAME.to_owned()])
            .await?
            .into_app_result()?;

        info!(user_id = %user_id, tenant = %tenant.name, "seeded administrator account");
        Ok(Some(user_id))
    }
}
