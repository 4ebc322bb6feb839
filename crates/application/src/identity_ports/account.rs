use steward_core::TenantId;
use steward_domain::UserId;

/// User account as returned by the identity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login name.
    pub user_name: String,
    /// Name shown in lists and pickers.
    pub display_name: Option<String>,
    /// Canonical email address.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Avatar URL or data URL.
    pub profile_picture_url: Option<String>,
    /// Tenant the account belongs to.
    pub tenant_id: Option<TenantId>,
    /// Denormalized tenant name used for search and export.
    pub tenant_name: Option<String>,
    /// Manager of the account.
    pub superior_id: Option<UserId>,
    /// Authentication source, `Local` for accounts created here.
    pub provider: String,
    /// Inactive accounts cannot sign in.
    pub is_active: bool,
    /// Role memberships, sorted by name.
    pub roles: Vec<String>,
}

impl UserAccount {
    /// Returns the display name, falling back to the user name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(self.user_name.as_str())
    }
}

/// Field values for an account that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    /// Unique login name.
    pub user_name: String,
    /// Name shown in lists and pickers.
    pub display_name: Option<String>,
    /// Canonical email address.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Avatar URL or data URL.
    pub profile_picture_url: Option<String>,
    /// Tenant the account belongs to.
    pub tenant_id: Option<TenantId>,
    /// Denormalized tenant name.
    pub tenant_name: Option<String>,
    /// Manager of the account.
    pub superior_id: Option<UserId>,
    /// Authentication source.
    pub provider: String,
    /// Inactive accounts cannot sign in.
    pub is_active: bool,
}
