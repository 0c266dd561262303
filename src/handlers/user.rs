//! 当前用户的 HTTP 处理器

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::{AppState, ValidatedJson},
    models::{
        user::{UpdateUserRequest, UserResponse},
        ApiResponse, StatusResponse,
    },
};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// 更新当前用户资料
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state
        .repos
        .users
        .update(user.id, req.into_changes())
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    tracing::info!(user_id = updated.id, "User profile updated");

    Ok(Json(ApiResponse::success(UserResponse::from(updated))))
}

/// 删除当前用户，级联删除其照片、评论与社交媒体
pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    if !state.repos.users.delete(user.id).await? {
        return Err(AppError::not_found("User not found"));
    }

    tracing::info!(user_id = user.id, "User deleted");

    Ok(Json(StatusResponse::success()))
}
