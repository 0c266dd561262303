//! 照片 HTTP 处理器

use crate::{
    auth::middleware::CurrentUser,
    error::AppError,
    middleware::{AppState, DeferredJson, IdPath, ValidatedJson, ValidatedQuery},
    models::{
        photo::{PhotoListQuery, PhotoRequest, PhotoResponse, PhotoWithUserResponse},
        ApiResponse, StatusResponse,
    },
    services::require_owner,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

const PHOTO_NOT_FOUND: &str = "Photo not found";

/// 创建照片
pub async fn create_photo(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(req): ValidatedJson<PhotoRequest>,
) -> Result<impl IntoResponse, AppError> {
    let photo = state.repos.photos.create(user.id, req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PhotoResponse::from(photo))),
    ))
}

/// 分页列出照片（附带所有者）
pub async fn list_photos(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<PhotoListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = query.limit_offset();
    let photos = state.repos.photos.list_with_user(limit, offset).await?;

    let data: Vec<PhotoWithUserResponse> = photos.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(data)))
}

/// 获取照片详情
pub async fn get_photo(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    let photo = state
        .repos
        .photos
        .find_with_user(id)
        .await?
        .ok_or_else(|| AppError::not_found(PHOTO_NOT_FOUND))?;

    Ok(Json(ApiResponse::success(PhotoWithUserResponse::from(photo))))
}

/// 更新照片（仅所有者）
pub async fn update_photo(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    IdPath(id): IdPath,
    body: DeferredJson<PhotoRequest>,
) -> Result<impl IntoResponse, AppError> {
    let photo = state
        .repos
        .photos
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(PHOTO_NOT_FOUND))?;
    require_owner(&photo, &user, "photo")?;
    let req = body.into_inner()?;

    let updated = state
        .repos
        .photos
        .update(id, req.into())
        .await?
        .ok_or_else(|| AppError::not_found(PHOTO_NOT_FOUND))?;

    Ok(Json(ApiResponse::success(PhotoResponse::from(updated))))
}

/// 删除照片（仅所有者），其评论一并删除
pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, AppError> {
    let photo = state
        .repos
        .photos
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(PHOTO_NOT_FOUND))?;
    require_owner(&photo, &user, "photo")?;

    if !state.repos.photos.delete(id).await? {
        return Err(AppError::not_found(PHOTO_NOT_FOUND));
    }

    Ok(Json(StatusResponse::success()))
}
