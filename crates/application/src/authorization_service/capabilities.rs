use tracing::warn;

use super::*;

/// Per-action flags resolved once per page load.
///
/// A flag is `false` both when the permission is missing and when the check
/// itself failed; failures only disable the matching affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserCapabilities {
    /// Create accounts.
    pub can_create: bool,
    /// Use free-text search.
    pub can_search: bool,
    /// Edit accounts.
    pub can_edit: bool,
    /// Delete accounts.
    pub can_delete: bool,
    /// Activate and deactivate accounts.
    pub can_activate: bool,
    /// Change role memberships.
    pub can_manage_roles: bool,
    /// Set passwords for other accounts.
    pub can_reset_password: bool,
    /// Grant and revoke permission claims.
    pub can_manage_permissions: bool,
    /// Import accounts from a spreadsheet.
    pub can_import: bool,
    /// Export accounts to a spreadsheet.
    pub can_export: bool,
}

impl UserCapabilities {
    /// Permissions backing each flag, in check order.
    pub const CHECKED_PERMISSIONS: [Permission; 10] = [
        Permission::UsersCreate,
        Permission::UsersSearch,
        Permission::UsersEdit,
        Permission::UsersDelete,
        Permission::UsersActive,
        Permission::UsersManageRoles,
        Permission::UsersResetPassword,
        Permission::UsersManagePermissions,
        Permission::UsersImport,
        Permission::UsersExport,
    ];

    fn set(&mut self, permission: Permission, granted: bool) {
        let flag = match permission {
            Permission::UsersCreate => &mut self.can_create,
            Permission::UsersSearch => &mut self.can_search,
            Permission::UsersEdit => &mut self.can_edit,
            Permission::UsersDelete => &mut self.can_delete,
            Permission::UsersActive => &mut self.can_activate,
            Permission::UsersManageRoles => &mut self.can_manage_roles,
            Permission::UsersResetPassword => &mut self.can_reset_password,
            Permission::UsersManagePermissions => &mut self.can_manage_permissions,
            Permission::UsersImport => &mut self.can_import,
            Permission::UsersExport => &mut self.can_export,
            _ => return,
        };

        *flag = granted;
    }
}

impl AuthorizationService {
    /// Resolves every user-administration capability of the principal.
    ///
    /// Checks run one after another; a failing check yields `false` for that
    /// flag and never fails the whole resolution.
    pub async fn user_capabilities(&self, actor: &UserIdentity) -> UserCapabilities {
        let mut capabilities = UserCapabilities::default();

        for permission in UserCapabilities::CHECKED_PERMISSIONS {
            let granted = match self.has_permission(actor, permission).await {
                Ok(granted) => granted,
                Err(error) => {
                    warn!(
                        error = %error,
                        subject = %actor.subject(),
                        permission = %permission,
                        "capability check failed; treating as denied"
                    );
                    false
                }
            };

            capabilities.set(permission, granted);
        }

        capabilities
    }
}
