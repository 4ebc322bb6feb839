use std::str::FromStr;

use serde::{Deserialize, Serialize};
use steward_core::AppError;

/// Permissions that can be granted to users as `Permission` claims.
///
/// The claim value of every variant is `"<Group>.<Action>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    /// Allows opening the user administration page.
    UsersView,
    /// Allows creating user accounts.
    UsersCreate,
    /// Allows editing user accounts.
    UsersEdit,
    /// Allows deleting user accounts.
    UsersDelete,
    /// Allows free-text user search.
    UsersSearch,
    /// Allows exporting users to a spreadsheet.
    UsersExport,
    /// Allows importing users from a spreadsheet.
    UsersImport,
    /// Allows activating and deactivating accounts.
    UsersActive,
    /// Allows changing user role memberships.
    UsersManageRoles,
    /// Allows setting a new password for another account.
    UsersResetPassword,
    /// Allows granting and revoking user permission claims.
    UsersManagePermissions,
    /// Allows listing roles.
    RolesView,
    /// Allows creating roles.
    RolesCreate,
    /// Allows editing roles.
    RolesEdit,
    /// Allows deleting roles.
    RolesDelete,
    /// Allows searching roles.
    RolesSearch,
    /// Allows exporting roles.
    RolesExport,
    /// Allows importing roles.
    RolesImport,
    /// Allows granting and revoking role permission claims.
    RolesManagePermissions,
    /// Allows listing tenants.
    TenantsView,
    /// Allows creating tenants.
    TenantsCreate,
    /// Allows editing tenants.
    TenantsEdit,
    /// Allows deleting tenants.
    TenantsDelete,
    /// Allows searching tenants.
    TenantsSearch,
    /// Allows reading the audit trail.
    AuditTrailsView,
    /// Allows searching the audit trail.
    AuditTrailsSearch,
    /// Allows exporting the audit trail.
    AuditTrailsExport,
    /// Allows reading system logs.
    LogsView,
    /// Allows searching system logs.
    LogsSearch,
    /// Allows exporting system logs.
    LogsExport,
    /// Allows purging system logs.
    LogsPurge,
    /// Allows opening the dashboard.
    DashboardsView,
}

impl Permission {
    /// Returns the stable claim value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsersView => "Users.View",
            Self::UsersCreate => "Users.Create",
            Self::UsersEdit => "Users.Edit",
            Self::UsersDelete => "Users.Delete",
            Self::UsersSearch => "Users.Search",
            Self::UsersExport => "Users.Export",
            Self::UsersImport => "Users.Import",
            Self::UsersActive => "Users.Active",
            Self::UsersManageRoles => "Users.ManageRoles",
            Self::UsersResetPassword => "Users.ResetPassword",
            Self::UsersManagePermissions => "Users.ManagePermissions",
            Self::RolesView => "Roles.View",
            Self::RolesCreate => "Roles.Create",
            Self::RolesEdit => "Roles.Edit",
            Self::RolesDelete => "Roles.Delete",
            Self::RolesSearch => "Roles.Search",
            Self::RolesExport => "Roles.Export",
            Self::RolesImport => "Roles.Import",
            Self::RolesManagePermissions => "Roles.ManagePermissions",
            Self::TenantsView => "Tenants.View",
            Self::TenantsCreate => "Tenants.Create",
            Self::TenantsEdit => "Tenants.Edit",
            Self::TenantsDelete => "Tenants.Delete",
            Self::TenantsSearch => "Tenants.Search",
            Self::AuditTrailsView => "AuditTrails.View",
            Self::AuditTrailsSearch => "AuditTrails.Search",
            Self::AuditTrailsExport => "AuditTrails.Export",
            Self::LogsView => "Logs.View",
            Self::LogsSearch => "Logs.Search",
            Self::LogsExport => "Logs.Export",
            Self::LogsPurge => "Logs.Purge",
            Self::DashboardsView => "Dashboards.View",
        }
    }

    /// Returns every known permission in catalog order.
    pub fn all() -> impl Iterator<Item = Self> {
        PERMISSION_CATALOG
            .iter()
            .flat_map(|group| group.permissions.iter().copied())
    }

    /// Returns the catalog group this permission belongs to.
    #[must_use]
    pub fn group(&self) -> &'static PermissionGroup {
        PERMISSION_CATALOG
            .iter()
            .find(|group| group.permissions.contains(self))
            .unwrap_or(&PERMISSION_CATALOG[0])
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

/// One functional module of the permission catalog.
#[derive(Debug, PartialEq, Eq)]
pub struct PermissionGroup {
    /// Display name of the module.
    pub name: &'static str,
    /// Human-readable description of the module.
    pub description: &'static str,
    /// Permissions declared by the module.
    pub permissions: &'static [Permission],
}

/// Every grantable permission, grouped by functional module.
pub static PERMISSION_CATALOG: &[PermissionGroup] = &[
    PermissionGroup {
        name: "Users",
        description: "Set permissions for user operations",
        permissions: &[
            Permission::UsersView,
            Permission::UsersCreate,
            Permission::UsersEdit,
            Permission::UsersDelete,
            Permission::UsersSearch,
            Permission::UsersExport,
            Permission::UsersImport,
            Permission::UsersActive,
            Permission::UsersManageRoles,
            Permission::UsersResetPassword,
            Permission::UsersManagePermissions,
        ],
    },
    PermissionGroup {
        name: "Roles",
        description: "Set permissions for role operations",
        permissions: &[
            Permission::RolesView,
            Permission::RolesCreate,
            Permission::RolesEdit,
            Permission::RolesDelete,
            Permission::RolesSearch,
            Permission::RolesExport,
            Permission::RolesImport,
            Permission::RolesManagePermissions,
        ],
    },
    PermissionGroup {
        name: "Tenants",
        description: "Set permissions for tenant operations",
        permissions: &[
            Permission::TenantsView,
            Permission::TenantsCreate,
            Permission::TenantsEdit,
            Permission::TenantsDelete,
            Permission::TenantsSearch,
        ],
    },
    PermissionGroup {
        name: "Audit Trails",
        description: "Set permissions for audit trail operations",
        permissions: &[
            Permission::AuditTrailsView,
            Permission::AuditTrailsSearch,
            Permission::AuditTrailsExport,
        ],
    },
    PermissionGroup {
        name: "Logs",
        description: "Set permissions for system log operations",
        permissions: &[
            Permission::LogsView,
            Permission::LogsSearch,
            Permission::LogsExport,
            Permission::LogsPurge,
        ],
    },
    PermissionGroup {
        name: "Dashboards",
        description: "Set permissions for dashboard operations",
        permissions: &[Permission::DashboardsView],
    },
];

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a user account is created.
    UserCreated,
    /// Emitted when a user account is edited.
    UserUpdated,
    /// Emitted when a user account is deleted.
    UserDeleted,
    /// Emitted when an account is activated or deactivated.
    UserActivationChanged,
    /// Emitted when an administrator sets a new password.
    UserPasswordReset,
    /// Emitted when a permission claim is granted to a user.
    UserPermissionGranted,
    /// Emitted when a permission claim is revoked from a user.
    UserPermissionRevoked,
    /// Emitted once per spreadsheet import.
    UsersImported,
    /// Emitted once per spreadsheet export.
    UsersExported,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserCreated => "user.created",
            Self::UserUpdated => "user.updated",
            Self::UserDeleted => "user.deleted",
            Self::UserActivationChanged => "user.activation_changed",
            Self::UserPasswordReset => "user.password_reset",
            Self::UserPermissionGranted => "user.permission_granted",
            Self::UserPermissionRevoked => "user.permission_revoked",
            Self::UsersImported => "users.imported",
            Self::UsersExported => "users.exported",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use super::{PERMISSION_CATALOG, Permission};

    #[test]
    fn permission_roundtrip_storage_value() {
        let permission = Permission::UsersCreate;
        let restored = Permission::from_str(permission.as_str());
        assert!(matches!(restored, Ok(Permission::UsersCreate)));
    }

    #[test]
    fn unknown_permission_is_rejected() {
        assert!(Permission::from_str("Users.Unknown").is_err());
    }

    #[test]
    fn catalog_values_are_unique_and_prefixed_by_group_key() {
        let mut seen = HashSet::new();
        for permission in Permission::all() {
            assert!(seen.insert(permission.as_str()));
            let group_key = permission.group().name.replace(' ', "");
            assert!(permission.as_str().starts_with(group_key.as_str()));
        }

        let declared: usize = PERMISSION_CATALOG
            .iter()
            .map(|group| group.permissions.len())
            .sum();
        assert_eq!(seen.len(), declared);
    }

    #[test]
    fn users_group_comes_first() {
        assert_eq!(Permission::UsersManagePermissions.group().name, "Users");
        assert_eq!(Permission::all().next(), Some(Permission::UsersView));
    }
}
