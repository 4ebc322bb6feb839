use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use steward_core::UserIdentity;
use steward_domain::UserId;

use crate::dto::{
    ActivationToggleResponse, BulkDeletePlanResponse, BulkDeleteRequest, BulkDeleteResultResponse,
    CreateUserRequest, ExportUsersQuery, GenericMessageResponse, ImportReportResponse,
    ResetPasswordRequest, TenantResponse, ToggleActiveRequest, UserAccountRequest,
    UserCapabilitiesResponse, UserDirectoryEntryResponse, UserFormResponse, UserListQueryRequest,
    UserPageResponse, UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod accounts;
mod bulk;
mod listing;
mod lookups;
mod security;
mod transfer;


pub use accounts::{create_user_handler, delete_user_handler, update_user_handler};
pub use bulk::{bulk_delete_users_handler, preview_bulk_delete_handler};
pub use listing::{list_users_handler, user_capabilities_handler, user_template_handler};
pub use lookups::{list_roles_handler, list_tenants_handler, user_directory_handler};
pub use security::{reset_password_handler, toggle_active_handler};
pub use transfer::{export_users_handler, import_users_handler};

fn parse_user_id(value: &str) -> ApiResult<UserId> {
    Ok(UserId::parse(value)?)
}
