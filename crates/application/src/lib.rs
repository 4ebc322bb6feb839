//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod authorization_service;
mod bootstrap_service;
mod cache_ports;
mod directory_ports;
mod identity_ports;
mod permission_panel_service;
mod session_service;
mod spreadsheet_ports;
mod user_admin_service;

#[cfg(test)]
mod test_support;

pub use audit_ports::{AuditEvent, AuditRepository};
pub use authorization_service::{AuthorizationRepository, AuthorizationService, UserCapabilities};
pub use bootstrap_service::{BootstrapAdmin, BootstrapService};
pub use cache_ports::{ClaimCache, DEFAULT_CLAIM_CACHE_TTL_SECONDS, claims_cache_key};
pub use directory_ports::{UserDirectory, UserDirectoryEntry};
pub use identity_ports::{
    IdentityResult, IdentityStore, MatchMode, NewUserAccount, PageRequest, PasswordHasher,
    SortDirection, TenantDirectory, TenantSummary, UserAccount, UserFilter, UserSort,
    UserSortField,
};
pub use permission_panel_service::{
    BulkToggleOutcome, PermissionAssignment, PermissionDescriptor, PermissionPanel,
    PermissionPanelService, PermissionToggle,
};
pub use session_service::{SessionService, identity_for};
pub use spreadsheet_ports::{ImportedSheet, SpreadsheetCodec};
pub use user_admin_service::{
    ActivationToggle, BulkDeleteOutcome, BulkDeletePlan, CreateUserInput, DEFAULT_PAGE_SIZE,
    EXPORT_COLUMNS, ExportedFile, IMPORT_COLUMNS, ImportReport, MAX_PAGE_SIZE, USERS_SHEET_NAME,
    UserAccountInput, UserAdminService, UserListQuery, UserPage,
};
