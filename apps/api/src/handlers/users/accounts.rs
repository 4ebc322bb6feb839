use super::*;

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let account = state
        .user_admin_service
        .create_user(&user, payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(account))))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<UserAccountRequest>,
) -> ApiResult<Json<UserResponse>> {
    let account = state
        .user_admin_service
        .update_user(&user, parse_user_id(&user_id)?, payload.into_input()?)
        .await?;

    Ok(Json(UserResponse::from(account)))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .user_admin_service
        .delete_user(&user, parse_user_id(&user_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
