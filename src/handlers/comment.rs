//! 评论 HTTP 处理器

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::{AppState, DeferredJson, IdPath, ValidatedJson},
    models::{
        comment::{
            CommentResponse, CommentWithRelationsResponse, CreateCommentRequest,
            UpdateCommentRequest,
        },
        ApiResponse, StatusResponse,
    },
    services::require_owner,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

const COMMENT_NOT_FOUND: &str = "Comment not found";

/// 创建评论，照片不存在时返回 404
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state.repos.photos.find_by_id(req.photo_id).await?.is_none() {
        return Err(AppError::not_found("Photo not found"));
    }

    let comment = state
        .repos
        .comments
        .create(user.id, req.photo_id, req.message)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CommentResponse::from(comment))),
    ))
}

/// 列出评论（附带作者与照片）
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let comments = state.repos.comments.list_with_relations().await?;

    let data: Vec<CommentWithRelationsResponse> = comments.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(data)))
}

/// 获取评论详情
pub async fn get_comment(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    let comment = state
        .repos
        .comments
        .find_with_relations(id)
        .await?
        .ok_or_else(|| AppError::not_found(COMMENT_NOT_FOUND))?;

    Ok(Json(ApiResponse::success(CommentWithRelationsResponse::from(comment))))
}

/// 更新评论（仅作者）
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    IdPath(id): IdPath,
    body: DeferredJson<UpdateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let comment = state
        .repos
        .comments
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(COMMENT_NOT_FOUND))?;
    require_owner(&comment, &user, "comment")?;
    let req = body.into_inner()?;

    let updated = state
        .repos
        .comments
        .update(id, req.message)
        .await?
        .ok_or_else(|| AppError::not_found(COMMENT_NOT_FOUND))?;

    Ok(Json(ApiResponse::success(CommentResponse::from(updated))))
}

/// 删除评论（仅作者）
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    let comment = state
        .repos
        .comments
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(COMMENT_NOT_FOUND))?;
    require_owner(&comment, &user, "comment")?;

    if !state.repos.comments.delete(id).await? {
        return Err(AppError::not_found(COMMENT_NOT_FOUND));
    }

    Ok(Json(StatusResponse::success()))
}
