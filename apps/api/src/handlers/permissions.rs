use axum::Json;
use axum::extract::{Extension, Path, State};

use steward_core::UserIdentity;
use steward_domain::UserId;

use crate::dto::{
    AssignPermissionsRequest, BulkPermissionResultResponse, PermissionPanelResponse,
    PermissionToggleRequest, PermissionToggleResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn permission_panel_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<PermissionPanelResponse>> {
    let panel = state
        .permission_panel_service
        .open_panel(&user, UserId::parse(&user_id)?)
        .await?;

    Ok(Json(PermissionPanelResponse::from(panel)))
}

pub async fn toggle_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<PermissionToggleRequest>,
) -> ApiResult<Json<PermissionToggleResponse>> {
    let toggle = state
        .permission_panel_service
        .toggle_permission(&user, UserId::parse(&user_id)?, payload.to_toggle()?)
        .await?;

    Ok(Json(PermissionToggleResponse::from(toggle)))
}

pub async fn assign_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<AssignPermissionsRequest>,
) -> ApiResult<Json<BulkPermissionResultResponse>> {
    let rows = payload
        .permissions
        .iter()
        .map(PermissionToggleRequest::to_toggle)
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = state
        .permission_panel_service
        .assign_permissions(&user, UserId::parse(&user_id)?, &rows)
        .await?;

    Ok(Json(BulkPermissionResultResponse::from(outcome)))
}
