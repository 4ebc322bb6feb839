use super::*;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.user_admin_service.list_roles(&user).await?))
}

pub async fn list_tenants_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<TenantResponse>>> {
    let tenants = state
        .user_admin_service
        .list_tenants(&user)
        .await?
        .into_iter()
        .map(TenantResponse::from)
        .collect();

    Ok(Json(tenants))
}

pub async fn user_directory_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<UserDirectoryEntryResponse>>> {
    let entries = state
        .user_admin_service
        .directory(&user)
        .await?
        .into_iter()
        .map(UserDirectoryEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
