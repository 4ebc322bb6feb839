use super::*;

pub async fn user_capabilities_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> Json<UserCapabilitiesResponse> {
    Json(
        state
            .authorization_service
            .user_capabilities(&user)
            .await
            .into(),
    )
}

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<UserListQueryRequest>,
) -> ApiResult<Json<UserPageResponse>> {
    let page = state
        .user_admin_service
        .list_users(&user, query.into_query()?)
        .await?;

    Ok(Json(UserPageResponse::from(page)))
}

pub async fn user_template_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<UserFormResponse>> {
    state
        .authorization_service
        .require_permission(&user, steward_domain::Permission::UsersCreate)
        .await?;

    Ok(Json(state.user_admin_service.new_user_template().into()))
}
