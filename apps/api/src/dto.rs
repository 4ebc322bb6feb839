mod auth;
mod common;
mod permissions;
mod users;

pub use auth::LoginRequest;
pub use common::{GenericMessageResponse, HealthResponse, UserIdentityResponse};
pub use permissions::{
    AssignPermissionsRequest, BulkPermissionResultResponse, PermissionAssignmentResponse,
    PermissionPanelResponse, PermissionToggleRequest, PermissionToggleResponse,
};
pub use users::{
    ActivationToggleResponse, BulkDeletePlanResponse, BulkDeleteRequest, BulkDeleteResultResponse,
    CreateUserRequest, ExportUsersQuery, ImportReportResponse, ResetPasswordRequest,
    TenantResponse, ToggleActiveRequest, UserAccountRequest, UserCapabilitiesResponse,
    UserDirectoryEntryResponse, UserFormResponse, UserListQueryRequest, UserPageResponse,
    UserResponse,
};
