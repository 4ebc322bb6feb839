//! User administration use-cases.
//!
//! Mediates listing, create/edit/delete, activation, password reset and
//! spreadsheet import/export between the caller and the identity store.
//! Every successful mutation refreshes the user directory and appends an
//! audit event.

use std::sync::Arc;

use steward_core::{AppError, AppResult, TenantId, UserIdentity};
use steward_domain::{DEFAULT_PROVIDER, DEFAULT_ROLE_NAME, Permission, UserId};
use tracing::warn;

use crate::{
    AuditEvent, AuditRepository, AuthorizationService, IdentityStore, SpreadsheetCodec,
    TenantDirectory, UserAccount, UserDirectory, UserSort,
};

mod activation;
mod create;
mod delete;
mod listing;
mod password;
mod transfer;
mod update;

#[cfg(test)]
mod tests;

pub use transfer::{EXPORT_COLUMNS, IMPORT_COLUMNS};

/// Page size used when the caller does not request one.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: usize = 200;

/// Sheet name used for spreadsheet import and export.
pub const USERS_SHEET_NAME: &str = "Users";

/// Listing request coming from the users grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserListQuery {
    /// Free-text search; matched case-insensitively.
    pub search: String,
    /// Optional role filter.
    pub role: Option<String>,
    /// Zero-based page index.
    pub page: usize,
    /// Requested page size; clamped to `1..=MAX_PAGE_SIZE`.
    pub page_size: usize,
    /// Requested ordering.
    pub sort: UserSort,
}

/// One page of accounts plus the total under the same filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    /// Accounts on this page.
    pub items: Vec<UserAccount>,
    /// Number of accounts matching the filter.
    pub total: u64,
    /// Zero-based page index that was served.
    pub page: usize,
    /// Effective page size after clamping.
    pub page_size: usize,
}

/// Form values for creating or editing an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccountInput {
    /// Unique login name.
    pub user_name: String,
    /// Name shown in lists and pickers.
    pub display_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Avatar URL or data URL.
    pub profile_picture_url: Option<String>,
    /// Tenant the account belongs to.
    pub tenant_id: Option<TenantId>,
    /// Manager of the account.
    pub superior_id: Option<UserId>,
    /// Authentication source.
    pub provider: String,
    /// Whether the account can sign in.
    pub is_active: bool,
    /// Requested role memberships. Ignored without `Users.ManageRoles`.
    pub assigned_roles: Vec<String>,
}

impl Default for UserAccountInput {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            display_name: None,
            email: None,
            phone_number: None,
            profile_picture_url: None,
            tenant_id: None,
            superior_id: None,
            provider: DEFAULT_PROVIDER.to_owned(),
            is_active: true,
            assigned_roles: vec![DEFAULT_ROLE_NAME.to_owned()],
        }
    }
}

/// Create form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Account fields.
    pub account: UserAccountInput,
    /// Initial password.
    pub password: String,
}

/// Effective bulk-delete selection shown in the confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDeletePlan {
    /// Accounts that will be deleted, in selection order.
    pub user_ids: Vec<UserId>,
    /// Whether the principal's own account was dropped from the selection.
    pub excluded_self: bool,
}

impl BulkDeletePlan {
    /// Number of accounts the confirmation prompt reports.
    #[must_use]
    pub fn count(&self) -> usize {
        self.user_ids.len()
    }
}

/// Result of a completed bulk delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkDeleteOutcome {
    /// Accounts deleted.
    pub deleted: usize,
}

/// Result of an activation toggle.
///
/// `is_active` is always the flipped value the caller should display, even
/// when persisting it failed; `error` then carries the store's messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationToggle {
    /// Account that was toggled.
    pub user_id: UserId,
    /// Flipped active flag.
    pub is_active: bool,
    /// Store messages when the change was not persisted.
    pub error: Option<String>,
}

/// Encoded export ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// Suggested download file name.
    pub file_name: String,
    /// MIME type of `content`.
    pub content_type: String,
    /// Encoded file bytes.
    pub content: Vec<u8>,
}

/// Summary of a spreadsheet import.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportReport {
    /// Accounts created.
    pub created: usize,
    /// Rows skipped because the user name already exists.
    pub skipped: usize,
    /// Per-row creation errors; these never abort the import.
    pub errors: Vec<String>,
}

/// Application service behind the user administration page.
#[derive(Clone)]
pub struct UserAdminService {
    identity_store: Arc<dyn IdentityStore>,
    tenant_directory: Arc<dyn TenantDirectory>,
    authorization_service: AuthorizationService,
    spreadsheet_codec: Arc<dyn SpreadsheetCodec>,
    user_directory: Arc<dyn UserDirectory>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl UserAdminService {
    /// Creates a new user administration service.
    #[must_use]
    pub fn new(
        identity_store: Arc<dyn IdentityStore>,
        tenant_directory: Arc<dyn TenantDirectory>,
        authorization_service: AuthorizationService,
        spreadsheet_codec: Arc<dyn SpreadsheetCodec>,
        user_directory: Arc<dyn UserDirectory>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            identity_store,
            tenant_directory,
            authorization_service,
            spreadsheet_codec,
            user_directory,
            audit_repository,
        }
    }

    /// Lists every role name for filters and forms.
    pub async fn list_roles(&self, actor: &UserIdentity) -> AppResult<Vec<String>> {
        self.authorization_service
            .require_permission(actor, Permission::UsersView)
            .await?;
        self.identity_store.list_role_names().await
    }

    /// Returns the current user directory snapshot.
    pub async fn directory(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<Vec<crate::UserDirectoryEntry>> {
        self.authorization_service
            .require_permission(actor, Permission::UsersView)
            .await?;
        self.user_directory.entries().await
    }

    /// Lists known tenants for pickers.
    pub async fn list_tenants(&self, actor: &UserIdentity) -> AppResult<Vec<crate::TenantSummary>> {
        self.authorization_service
            .require_permission(actor, Permission::UsersView)
            .await?;
        self.tenant_directory.list_tenants().await
    }

    async fn load_user(&self, user_id: UserId) -> AppResult<UserAccount> {
        self.identity_store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("the application user [{user_id}] was not found"))
            })
    }

    async fn after_mutation(&self, event: AuditEvent) -> AppResult<()> {
        if let Err(error) = self.user_directory.refresh().await {
            warn!(error = %error, "user directory refresh failed after account mutation");
        }

        self.audit_repository.append_event(event).await
    }
}

fn is_self(actor: &UserIdentity, user_id: UserId) -> bool {
    actor.subject() == user_id.to_string()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

fn validation_message(error: AppError) -> String {
    match error {
        AppError::Validation(message) => message,
        other => other.to_string(),
    }
}
