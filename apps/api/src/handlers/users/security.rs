use super::*;

pub async fn toggle_active_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<ToggleActiveRequest>,
) -> ApiResult<Json<ActivationToggleResponse>> {
    let toggle = state
        .user_admin_service
        .toggle_active(&user, parse_user_id(&user_id)?, payload.is_active)
        .await?;

    Ok(Json(ActivationToggleResponse::from(toggle)))
}

pub async fn reset_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    state
        .user_admin_service
        .reset_password(&user, parse_user_id(&user_id)?, &payload.new_password)
        .await?;

    Ok(Json(GenericMessageResponse {
        message: "Password reset successfully.".to_owned(),
    }))
}
