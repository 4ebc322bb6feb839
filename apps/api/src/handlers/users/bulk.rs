use super::*;

pub async fn preview_bulk_delete_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<BulkDeleteRequest>,
) -> ApiResult<Json<BulkDeletePlanResponse>> {
    let plan = state
        .user_admin_service
        .preview_bulk_delete(&user, &payload.user_ids()?)
        .await?;

    Ok(Json(BulkDeletePlanResponse::from(plan)))
}

pub async fn bulk_delete_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<BulkDeleteRequest>,
) -> ApiResult<Json<BulkDeleteResultResponse>> {
    let outcome = state
        .user_admin_service
        .delete_users(&user, &payload.user_ids()?)
        .await?;

    Ok(Json(BulkDeleteResultResponse::from(outcome)))
}
