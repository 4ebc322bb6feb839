use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Query string of the users grid.
#[derive(Debug, Default, Deserialize)]
pub struct UserListQueryRequest {
    pub search: Option<String>,
    pub role: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

/// Query string of the export download.
#[derive(Debug, Default, Deserialize)]
pub struct ExportUsersQuery {
    pub search: Option<String>,
    pub role: Option<String>,
}

/// Account form fields shared by create and edit.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "user-account-request.ts")]
pub struct UserAccountRequest {
    pub user_name: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture_url: Option<String>,
    pub tenant_id: Option<String>,
    pub superior_id: Option<String>,
    pub provider: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub assigned_roles: Vec<String>,
}

/// Incoming payload for account creation.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "create-user-request.ts")]
pub struct CreateUserRequest {
    #[serde(flatten)]
    pub account: UserAccountRequest,
    pub password: String,
}

/// Selection submitted to the bulk-delete endpoints.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bulk-delete-request.ts")]
pub struct BulkDeleteRequest {
    pub user_ids: Vec<String>,
}

/// Activation state the grid currently shows for the row.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "toggle-active-request.ts")]
pub struct ToggleActiveRequest {
    pub is_active: bool,
}

/// New password chosen by the administrator.
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "reset-password-request.ts")]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

/// API representation of an account.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user-response.ts")]
pub struct UserResponse {
    pub id: String,
    pub user_name: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture_url: Option<String>,
    pub tenant_id: Option<String>,
    pub tenant_name: Option<String>,
    pub superior_id: Option<String>,
    pub provider: String,
    pub is_active: bool,
    pub roles: Vec<String>,
}

/// One page of the users grid.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user-page-response.ts")]
pub struct UserPageResponse {
    pub items: Vec<UserResponse>,
    #[ts(type = "number")]
    pub total: u64,
    #[ts(type = "number")]
    pub page: usize,
    #[ts(type = "number")]
    pub page_size: usize,
}

/// Pre-filled create form.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user-form-response.ts")]
pub struct UserFormResponse {
    pub user_name: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub tenant_id: Option<String>,
    pub superior_id: Option<String>,
    pub provider: String,
    pub is_active: bool,
    pub assigned_roles: Vec<String>,
}

/// Action affordances of the users page.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user-capabilities-response.ts")]
pub struct UserCapabilitiesResponse {
    pub can_create: bool,
    pub can_search: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_activate: bool,
    pub can_manage_roles: bool,
    pub can_reset_password: bool,
    pub can_manage_permissions: bool,
    pub can_import: bool,
    pub can_export: bool,
}

/// Bulk-delete confirmation.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bulk-delete-plan-response.ts")]
pub struct BulkDeletePlanResponse {
    pub user_ids: Vec<String>,
    #[ts(type = "number")]
    pub count: usize,
    pub excluded_self: bool,
}

/// Result of a bulk delete.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bulk-delete-result-response.ts")]
pub struct BulkDeleteResultResponse {
    #[ts(type = "number")]
    pub deleted: usize,
}

/// Result of an activation toggle.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "activation-toggle-response.ts")]
pub struct ActivationToggleResponse {
    pub user_id: String,
    pub is_active: bool,
    pub error: Option<String>,
}

/// Summary of a spreadsheet import.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "import-report-response.ts")]
pub struct ImportReportResponse {
    #[ts(type = "number")]
    pub created: usize,
    #[ts(type = "number")]
    pub skipped: usize,
    pub errors: Vec<String>,
}

/// Entry of the superior picker.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user-directory-entry-response.ts")]
pub struct UserDirectoryEntryResponse {
    pub id: String,
    pub user_name: String,
    pub display_name: String,
    pub is_active: bool,
}

/// Entry of the tenant picker.
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "tenant-response.ts")]
pub struct TenantResponse {
    pub id: String,
    pub name: String,
}
