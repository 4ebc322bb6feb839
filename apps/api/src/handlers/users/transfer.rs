use axum::http::header;
use axum::response::{IntoResponse, Response};
use steward_core::AppError;

use super::*;

pub async fn export_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<ExportUsersQuery>,
) -> ApiResult<Response> {
    let file = state
        .user_admin_service
        .export_users(
            &user,
            query.search.as_deref().unwrap_or_default(),
            query.role.as_deref().filter(|value| !value.trim().is_empty()),
        )
        .await?;

    let disposition = header::HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        file.file_name
    ))
    .map_err(|error| AppError::Internal(format!("invalid export file name: {error}")))?;
    let content_type = header::HeaderValue::from_str(&file.content_type)
        .map_err(|error| AppError::Internal(format!("invalid export content type: {error}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.content,
    )
        .into_response())
}

pub async fn import_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    body: Bytes,
) -> ApiResult<Json<ImportReportResponse>> {
    let report = state
        .user_admin_service
        .import_users(&user, &body)
        .await?;

    Ok(Json(ImportReportResponse::from(report)))
}
