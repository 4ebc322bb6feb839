use steward_application::{
    AuthorizationService, PermissionPanelService, SessionService, UserAdminService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_admin_service: UserAdminService,
    pub permission_panel_service: PermissionPanelService,
    pub authorization_service: AuthorizationService,
    pub session_service: SessionService,
    pub frontend_url: String,
    pub store_backend: &'static str,
}
