mod conversions;
mod types;

pub use types::{
    ActivationToggleResponse, BulkDeletePlanResponse, BulkDeleteRequest, BulkDeleteResultResponse,
    CreateUserRequest, ExportUsersQuery, ImportReportResponse, ResetPasswordRequest,
    TenantResponse, ToggleActiveRequest, UserAccountRequest, UserCapabilitiesResponse,
    UserDirectoryEntryResponse, UserFormResponse, UserListQueryRequest, UserPageResponse,
    UserResponse,
};
